use super::*;

#[test]
fn newest_ticket_is_current() {
    let seq = RequestSequence::new();
    let first = seq.begin();
    assert!(seq.is_current(first));
    let second = seq.begin();
    assert!(!seq.is_current(first));
    assert!(seq.is_current(second));
    assert!(second > first);
}

#[test]
fn invalidate_supersedes_outstanding() {
    let seq = RequestSequence::new();
    let ticket = seq.begin();
    seq.invalidate();
    assert!(!seq.is_current(ticket));
}

#[test]
fn slot_drops_stale_response() {
    let mut slot: Slot<Vec<&str>> = Slot::default();
    let slow = slot.begin();
    let fast = slot.begin();

    assert!(slot.apply(fast, vec!["golf"]));
    assert!(!slot.apply(slow, vec!["passat"]));
    assert_eq!(slot.get(), &vec!["golf"]);
}

#[test]
fn slot_reset_blocks_in_flight() {
    let mut slot: Slot<Vec<u8>> = Slot::default();
    let ticket = slot.begin();
    slot.reset(Vec::new());
    assert!(!slot.apply(ticket, vec![1]));
    assert!(slot.get().is_empty());
}
