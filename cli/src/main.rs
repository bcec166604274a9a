use std::path::{Path, PathBuf};
use std::sync::Arc;

use carmarket::config::{ClientConfig, ConfigError};
use carmarket::net::catalog::{self, CatalogResource};
use carmarket::net::gateway::{ApiError, Gateway};
use carmarket::net::listings;
use carmarket::net::types::{CarModel, Filter, Generation, ImageUpload, Manufacturer, Modification};
use carmarket::state::auth::{AuthError, Role, Session, SessionHandle, SessionStore};
use carmarket::state::catalog::CatalogSelection;
use carmarket::state::storage::{FileStore, StorageError, load_json, save_json};
use carmarket::util::guard::{Redirect, RouteAccess, check_route, home_view, nav_links};
use carmarket::util::listing::{image_orders, move_image};
use carmarket::util::validate::{
    CarModelForm, GenerationForm, ListingForm, LoginForm, ManufacturerForm, ModificationForm, RegisterForm,
    ValidationError,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// Durable-store key for the last filter used by `listings list`.
const LISTING_FILTER_KEY: &str = "listingFilter";

/// Last `listings list` filter. `Filter` does not serialize the
/// modification selection, so the draft carries it alongside.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingDraft {
    #[serde(flatten)]
    filter: Filter,
    modification_id: Option<i64>,
}

impl ListingDraft {
    fn new(filter: Filter) -> Self {
        let modification_id = filter.modification_id;
        Self { filter, modification_id }
    }

    fn into_filter(self) -> Filter {
        Filter { modification_id: self.modification_id, ..self.filter }
    }
}

const ADMIN_ROLES: [Role; 3] = [Role::AdminBasic, Role::AdminManager, Role::AdminGod];

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("not permitted here; redirect to {0}")]
    Redirect(&'static str),
    #[error("cannot move image {from} to {to}: listing has {len} images")]
    InvalidMove { from: usize, to: usize, len: usize },
    #[error("failed to read {path}: {source}")]
    ReadImage { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "carmarket", about = "Vehicle marketplace API client")]
struct Cli {
    /// Overrides `CARMARKET_API_URL`.
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CARMARKET_PASSWORD")]
        password: String,
    },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone_number: String,
        #[arg(long, env = "CARMARKET_PASSWORD")]
        password: String,
    },
    Logout,
    /// Print the current session, home view and navigation links.
    Whoami,
    Listings(ListingsCommand),
    Catalog(CatalogCommand),
}

// =============================================================================
// LISTINGS ARGS
// =============================================================================

#[derive(Args, Debug)]
struct ListingsCommand {
    #[command(subcommand)]
    command: ListingsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ListingsSubcommand {
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Reuse the filter from the previous `list` run.
        #[arg(long, default_value_t = false)]
        last: bool,
    },
    Get {
        listing_id: i64,
    },
    ByUser {
        user_id: i64,
    },
    /// Listings created by the signed-in user.
    Mine,
    Create {
        #[arg(long)]
        modification_id: Option<i64>,
        #[arg(long, default_value = "")]
        price: String,
        #[arg(long, default_value = "")]
        mileage: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// Move one image to a new position and save the order.
    Reorder {
        listing_id: i64,
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
    },
    SaveSearch {
        name: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    SavedSearches,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    #[arg(long)]
    min_price: Option<i64>,
    #[arg(long)]
    max_price: Option<i64>,
    #[arg(long)]
    min_mileage: Option<i64>,
    #[arg(long)]
    max_mileage: Option<i64>,
    #[arg(long)]
    manufacturer_id: Option<i64>,
    #[arg(long)]
    car_model_id: Option<i64>,
    #[arg(long)]
    generation_id: Option<i64>,
    #[arg(long)]
    modification_id: Option<i64>,
    #[arg(long)]
    drivetrain_type: Option<String>,
    #[arg(long)]
    fuel_type: Option<String>,
    #[arg(long)]
    min_horsepower: Option<i32>,
    #[arg(long)]
    max_horsepower: Option<i32>,
    #[arg(long)]
    transmission_type: Option<String>,
}

impl FilterArgs {
    fn into_filter(self) -> Filter {
        let mut selection = CatalogSelection::new();
        selection.select_manufacturer(self.manufacturer_id);
        selection.select_model(self.car_model_id);
        selection.select_generation(self.generation_id);
        selection.select_modification(self.modification_id);
        selection.apply_to(Filter {
            min_price: self.min_price,
            max_price: self.max_price,
            min_mileage: self.min_mileage,
            max_mileage: self.max_mileage,
            drivetrain_type: self.drivetrain_type,
            fuel_type: self.fuel_type,
            min_horsepower: self.min_horsepower,
            max_horsepower: self.max_horsepower,
            transmission_type: self.transmission_type,
            ..Filter::default()
        })
    }
}

// =============================================================================
// CATALOG ARGS
// =============================================================================

#[derive(Args, Debug)]
struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Level {
    Manufacturer,
    Model,
    Generation,
    Modification,
}

#[derive(Subcommand, Debug)]
enum CatalogSubcommand {
    List {
        level: Level,
    },
    Get {
        level: Level,
        id: i64,
    },
    Delete {
        level: Level,
        id: i64,
    },
    /// Walk the manufacturer → model → generation → modification chain and
    /// print the options at each selected level.
    Browse {
        #[arg(long)]
        manufacturer_id: Option<i64>,
        #[arg(long)]
        car_model_id: Option<i64>,
        #[arg(long)]
        generation_id: Option<i64>,
    },
    AddManufacturer {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        country: String,
    },
    AddModel {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        manufacturer_id: Option<i64>,
    },
    AddGeneration {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        car_model_id: Option<i64>,
        #[arg(long, default_value = "")]
        start_year: String,
    },
    AddModification(AddModificationArgs),
}

#[derive(Args, Debug)]
struct AddModificationArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long)]
    generation_id: Option<i64>,
    #[arg(long, default_value = "")]
    drivetrain: String,
    #[arg(long, default_value = "")]
    engine_type: String,
    #[arg(long, default_value = "")]
    fuel_type: String,
    #[arg(long, default_value = "")]
    horsepower: String,
    #[arg(long, default_value = "")]
    torque: String,
    #[arg(long, default_value = "")]
    transmission_type: String,
    #[arg(long, default_value = "")]
    number_of_gears: String,
}

// =============================================================================
// ENTRY
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("carmarket=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_owned();
    }

    let gateway = Gateway::new(&config, SessionHandle::default())?;
    let storage = Arc::new(FileStore::new(&config.state_dir));
    let store = SessionStore::initialize(gateway, storage, config.logout_scope);

    match cli.command {
        Command::Login { username, password } => run_login(&store, username, password).await,
        Command::Register { username, email, phone_number, password } => {
            run_register(&store, RegisterForm { username, email, phone_number, password }).await
        }
        Command::Logout => {
            let redirect = store.logout()?;
            print_json(&json!({ "redirect": redirect.path() }))
        }
        Command::Whoami => run_whoami(&store),
        Command::Listings(listings) => run_listings(&store, listings).await,
        Command::Catalog(catalog) => run_catalog(&store, catalog).await,
    }
}

fn require(store: &SessionStore, roles: Option<&[Role]>) -> Result<(), CliError> {
    match check_route(&store.state(), roles) {
        RouteAccess::Allow => Ok(()),
        RouteAccess::Redirect(redirect) => Err(CliError::Redirect(redirect.path())),
    }
}

// =============================================================================
// AUTH
// =============================================================================

async fn run_login(store: &SessionStore, username: String, password: String) -> Result<(), CliError> {
    let credentials = LoginForm { username, password }.validate()?;
    let session = store.login(&credentials.username, &credentials.password).await?;
    print_json(&session_json(&session)?)
}

async fn run_register(store: &SessionStore, form: RegisterForm) -> Result<(), CliError> {
    let registration = form.validate()?;
    let session = store
        .register(&registration.username, &registration.identifier, &registration.password)
        .await?;
    print_json(&session_json(&session)?)
}

/// Session as printed to the terminal: everything but the bearer token.
fn session_json(session: &Session) -> Result<Value, CliError> {
    let mut value = serde_json::to_value(session)?;
    if let Some(map) = value.as_object_mut() {
        map.remove("token");
    }
    Ok(value)
}

fn run_whoami(store: &SessionStore) -> Result<(), CliError> {
    let state = store.state();
    let links: Vec<Value> = nav_links(&state)
        .into_iter()
        .map(|link| json!({ "label": link.label, "path": link.path }))
        .collect();
    let session = store.session().as_ref().map(session_json).transpose()?;
    print_json(&json!({
        "session": session,
        "active": store.is_active(),
        "home": format!("{:?}", home_view(&state)),
        "nav": links,
    }))
}

// =============================================================================
// LISTINGS
// =============================================================================

async fn run_listings(store: &SessionStore, listings: ListingsCommand) -> Result<(), CliError> {
    let gateway = store.gateway();
    match listings.command {
        ListingsSubcommand::List { filter, last } => {
            let draft = if last {
                load_json::<ListingDraft>(store.storage(), LISTING_FILTER_KEY).unwrap_or_default()
            } else {
                ListingDraft::new(filter.into_filter())
            };
            save_json(store.storage(), LISTING_FILTER_KEY, &draft)?;
            let filter = draft.into_filter();
            let found = listings::get_all(gateway, &filter).await?;
            tracing::info!(count = found.len(), "listings fetched");
            print_json(&serde_json::to_value(found)?)
        }
        ListingsSubcommand::Get { listing_id } => {
            print_json(&serde_json::to_value(listings::get_by_id(gateway, listing_id).await?)?)
        }
        ListingsSubcommand::ByUser { user_id } => {
            print_json(&serde_json::to_value(listings::get_by_user(gateway, user_id).await?)?)
        }
        ListingsSubcommand::Mine => {
            require(store, None)?;
            let Some(session) = store.session() else {
                return Err(CliError::Redirect(Redirect::Login.path()));
            };
            print_json(&serde_json::to_value(listings::get_by_user(gateway, session.subject_id).await?)?)
        }
        ListingsSubcommand::Create { modification_id, price, mileage, description, images } => {
            require(store, Some(&[Role::ClientBasic]))?;
            let form = ListingForm { modification_id, price, mileage, description, image_count: images.len() };
            let request = form.validate()?;
            let uploads = images.iter().map(|path| read_image(path)).collect::<Result<Vec<_>, _>>()?;
            let created = listings::create(gateway, &request, uploads).await?;
            print_json(&serde_json::to_value(created)?)
        }
        ListingsSubcommand::Reorder { listing_id, from, to } => {
            require(store, Some(&[Role::ClientBasic]))?;
            let listing = listings::get_by_id(gateway, listing_id).await?;
            let mut order = image_orders(&listing.images);
            if !move_image(&mut order, from, to) {
                return Err(CliError::InvalidMove { from, to, len: order.len() });
            }
            listings::update_image_order(gateway, listing_id, &order).await?;
            print_json(&serde_json::to_value(order)?)
        }
        ListingsSubcommand::SaveSearch { name, filter } => {
            require(store, None)?;
            listings::save_filter(gateway, &name, &filter.into_filter()).await?;
            print_json(&json!({ "saved": name }))
        }
        ListingsSubcommand::SavedSearches => {
            require(store, None)?;
            print_json(&serde_json::to_value(listings::get_saved_filters(gateway).await?)?)
        }
    }
}

fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadImage { path: path.to_path_buf(), source })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_owned(), |name| name.to_string_lossy().into_owned());
    Ok(ImageUpload { mime_type: mime_for(path).to_owned(), file_name, bytes })
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// CATALOG
// =============================================================================

async fn run_catalog(store: &SessionStore, catalog: CatalogCommand) -> Result<(), CliError> {
    let gateway = store.gateway();
    match catalog.command {
        CatalogSubcommand::List { level } => match level {
            Level::Manufacturer => print_all::<Manufacturer>(gateway).await,
            Level::Model => print_all::<CarModel>(gateway).await,
            Level::Generation => print_all::<Generation>(gateway).await,
            Level::Modification => print_all::<Modification>(gateway).await,
        },
        CatalogSubcommand::Get { level, id } => match level {
            Level::Manufacturer => print_one::<Manufacturer>(gateway, id).await,
            Level::Model => print_one::<CarModel>(gateway, id).await,
            Level::Generation => print_one::<Generation>(gateway, id).await,
            Level::Modification => print_one::<Modification>(gateway, id).await,
        },
        CatalogSubcommand::Delete { level, id } => {
            require(store, Some(&ADMIN_ROLES))?;
            match level {
                Level::Manufacturer => catalog::delete_by_id::<Manufacturer>(gateway, id).await?,
                Level::Model => catalog::delete_by_id::<CarModel>(gateway, id).await?,
                Level::Generation => catalog::delete_by_id::<Generation>(gateway, id).await?,
                Level::Modification => catalog::delete_by_id::<Modification>(gateway, id).await?,
            }
            print_json(&json!({ "deleted": id }))
        }
        CatalogSubcommand::Browse { manufacturer_id, car_model_id, generation_id } => {
            let mut selection = CatalogSelection::new();
            selection.refresh_manufacturers(gateway).await?;
            selection.select_manufacturer(manufacturer_id);
            selection.refresh_models(gateway).await?;
            selection.select_model(car_model_id);
            selection.refresh_generations(gateway).await?;
            selection.select_generation(generation_id);
            selection.refresh_modifications(gateway).await?;
            print_json(&json!({
                "manufacturers": selection.manufacturers(),
                "models": selection.models(),
                "generations": selection.generations(),
                "modifications": selection.modifications(),
            }))
        }
        CatalogSubcommand::AddManufacturer { name, country } => {
            require(store, Some(&ADMIN_ROLES))?;
            let request = ManufacturerForm { name, country }.validate()?;
            catalog::create::<Manufacturer>(gateway, &request).await?;
            print_json(&serde_json::to_value(request)?)
        }
        CatalogSubcommand::AddModel { name, manufacturer_id } => {
            require(store, Some(&ADMIN_ROLES))?;
            let request = CarModelForm { name, manufacturer_id }.validate()?;
            catalog::create::<CarModel>(gateway, &request).await?;
            print_json(&serde_json::to_value(request)?)
        }
        CatalogSubcommand::AddGeneration { name, car_model_id, start_year } => {
            require(store, Some(&ADMIN_ROLES))?;
            let request = GenerationForm { car_model_id, name, start_year }.validate()?;
            catalog::create::<Generation>(gateway, &request).await?;
            print_json(&serde_json::to_value(request)?)
        }
        CatalogSubcommand::AddModification(args) => {
            require(store, Some(&ADMIN_ROLES))?;
            let form = ModificationForm {
                name: args.name,
                generation_id: args.generation_id,
                drivetrain: args.drivetrain,
                engine_type: args.engine_type,
                fuel_type: args.fuel_type,
                horsepower: args.horsepower,
                torque: args.torque,
                transmission_type: args.transmission_type,
                number_of_gears: args.number_of_gears,
            };
            let request = form.validate()?;
            catalog::create::<Modification>(gateway, &request).await?;
            print_json(&serde_json::to_value(request)?)
        }
    }
}

async fn print_all<R>(gateway: &Gateway) -> Result<(), CliError>
where
    R: CatalogResource + Serialize,
{
    let items = catalog::get_all::<R>(gateway).await?;
    print_json(&serde_json::to_value(items)?)
}

async fn print_one<R>(gateway: &Gateway, id: i64) -> Result<(), CliError>
where
    R: CatalogResource + Serialize,
{
    let item = catalog::get_by_id::<R>(gateway, id).await?;
    print_json(&serde_json::to_value(item)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(Path::new("a/front.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("rear.png")), "image/png");
        assert_eq!(mime_for(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn filter_args_carry_catalog_chain() {
        let args = FilterArgs {
            manufacturer_id: Some(1),
            car_model_id: Some(2),
            generation_id: Some(3),
            modification_id: Some(4),
            max_price: Some(9000),
            ..FilterArgs::default()
        };
        let filter = args.into_filter();
        assert_eq!(filter.manufacturer_id, Some(1));
        assert_eq!(filter.generation_id, Some(3));
        assert_eq!(filter.modification_id, Some(4));
        assert_eq!(filter.max_price, Some(9000));
    }

    #[test]
    fn cli_parses_nested_commands() {
        let cli = Cli::try_parse_from(["carmarket", "catalog", "get", "manufacturer", "5"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Catalog(CatalogCommand { command: CatalogSubcommand::Get { level: Level::Manufacturer, id: 5 } })
        ));
    }

    #[test]
    fn printed_session_omits_token() {
        let session = Session {
            subject_id: 7,
            username: "ana".to_owned(),
            email: None,
            phone_number: None,
            roles: std::collections::BTreeSet::from([Role::ClientBasic]),
            token: "secret.token.value".to_owned(),
        };
        let value = session_json(&session).unwrap();
        assert!(value.get("token").is_none());
        assert_eq!(value["username"], "ana");
        assert!(!value.to_string().contains("secret.token.value"));
    }

    #[test]
    fn listing_draft_keeps_modification_selection() {
        let store = carmarket::state::storage::MemoryStore::new();
        let filter = Filter { max_price: Some(9000), modification_id: Some(4), ..Filter::default() };

        save_json(&store, LISTING_FILTER_KEY, &ListingDraft::new(filter.clone())).unwrap();
        let restored = load_json::<ListingDraft>(&store, LISTING_FILTER_KEY).unwrap().into_filter();
        assert_eq!(restored, filter);
    }
}
