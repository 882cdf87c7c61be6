use std::time::Duration;

use mongodb::{Client, Database, bson::doc};
use tokio::time::sleep;
use tracing::debug;

use super::{
    config::MongoConfig,
    error::{MongoDaoError, MongoResult},
};

const PING_ATTEMPTS: u32 = 5;
const FIRST_PING_DELAY: Duration = Duration::from_millis(250);
const MAX_PING_DELAY: Duration = Duration::from_secs(5);

/// Open a client for `config` and wait until the server answers a ping.
///
/// Gives up after [`PING_ATTEMPTS`] pings; the storage supervisor decides
/// when to try again.
pub async fn open(config: &MongoConfig) -> MongoResult<(Client, Database)> {
    let client = Client::with_options(config.options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(&config.database_name);

    let mut attempts = 0;
    let mut delay = FIRST_PING_DELAY;
    loop {
        attempts += 1;
        match ping(&database).await {
            Ok(()) => return Ok((client, database)),
            Err(source) if attempts >= PING_ATTEMPTS => {
                return Err(MongoDaoError::InitialPing { attempts, source });
            }
            Err(err) => {
                debug!(attempts, error = %err, "MongoDB ping failed; retrying");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_PING_DELAY);
            }
        }
    }
}

/// Round-trip a `ping` command.
pub async fn ping(database: &Database) -> Result<(), mongodb::error::Error> {
    database.run_command(doc! { "ping": 1 }).await.map(|_| ())
}
