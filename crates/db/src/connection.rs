use eventplanner_config::Settings;
use mongodb::{Client, Database, options::ClientOptions};
use tracing::info;

const APP_NAME: &str = "eventplanner";

/// Open the planner's database and check that the server answers.
pub async fn connect(settings: &Settings) -> Result<Database, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(&settings.database.url).await?;
    client_options.app_name = Some(APP_NAME.to_string());
    client_options.max_pool_size = settings.database.max_pool_size.or(client_options.max_pool_size);
    client_options.min_pool_size = settings.database.min_pool_size.or(client_options.min_pool_size);
    let pool = (client_options.min_pool_size, client_options.max_pool_size);

    let client = Client::with_options(client_options)?;
    let database = client.database(&settings.database.name);
    database.run_command(bson::doc! { "ping": 1 }).await?;

    info!(
        db = %settings.database.name,
        backend = ?settings.store.backend,
        min_pool = ?pool.0,
        max_pool = ?pool.1,
        "Connected to the planner store"
    );
    Ok(database)
}
