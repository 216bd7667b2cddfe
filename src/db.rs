use futures::{
    FutureExt,
    future::{self, BoxFuture, Shared},
};
use migration::Migrator;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement,
};
use sea_orm_migration::MigratorTrait;

/// Establishment failure, shared by every waiter of the provider.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{0}")]
pub struct ConnectError(String);

/// Owns the single database handle of the process.
///
/// Establishment runs at most once; every caller of [`ConnectionProvider::ready`]
/// observes the same outcome. A failed establishment is never retried.
#[derive(Clone)]
pub struct ConnectionProvider {
    ready: Shared<BoxFuture<'static, Result<DatabaseConnection, ConnectError>>>,
}

impl ConnectionProvider {
    /// Prepares establishment. Nothing happens until the provider is first
    /// awaited, so startup drives it right away.
    pub fn establish(options: ConnectOptions, run_migrations: bool) -> Self {
        let ready = async move {
            match connect_and_migrate(options, run_migrations).await {
                Ok(db) => {
                    tracing::info!(
                        backend = ?db.get_database_backend(),
                        "database connection established"
                    );
                    Ok(db)
                },
                Err(err) => {
                    tracing::error!(error = %err, "failed to establish database connection");
                    Err(ConnectError(err.to_string()))
                },
            }
        }
        .boxed()
        .shared();

        Self { ready }
    }

    /// A provider around an already open connection.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { ready: future::ready(Ok(db)).boxed().shared() }
    }

    pub async fn ready(&self) -> Result<DatabaseConnection, ConnectError> {
        self.ready.clone().await
    }
}

pub async fn connect_and_migrate(
    options: ConnectOptions,
    run_migrations: bool,
) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;

    if db.get_database_backend() == DbBackend::Sqlite {
        for pragma in ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"] {
            db.execute(Statement::from_string(DbBackend::Sqlite, pragma.to_string())).await?;
        }
    }

    if run_migrations {
        Migrator::up(&db, None).await?;
    }

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(url: &str) -> ConnectOptions {
        let mut options = ConnectOptions::new(url.to_string());
        options.max_connections(1);
        options
    }

    #[tokio::test]
    async fn establishes_and_creates_schema() {
        let provider = ConnectionProvider::establish(options("sqlite::memory:"), true);
        let db = provider.ready().await.unwrap();

        let rows = db
            .query_all(Statement::from_string(
                DbBackend::Sqlite,
                "SELECT * FROM listings".to_string(),
            ))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn failure_is_shared_by_every_waiter() {
        let options = options("sqlite:///nonexistent-dir/cartelera/x.db");
        let provider = ConnectionProvider::establish(options, true);

        let first = provider.ready().await.unwrap_err();
        let second = provider.clone().ready().await.unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
        assert!(!first.to_string().is_empty());
    }
}
