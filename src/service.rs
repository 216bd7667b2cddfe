use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait, QueryFilter,
    QueryTrait, Statement, sea_query::Expr,
};

use crate::{
    db::{ConnectError, ConnectionProvider},
    entities::listing,
    models::{Listing, ListingPayload},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Unavailable(#[from] ConnectError),
    #[error(transparent)]
    Query(#[from] DbErr),
}

pub fn select_all(backend: DbBackend) -> Statement {
    listing::Entity::find().build(backend)
}

/// Insert binding all eight columns; absent optional fields bind as NULL.
pub fn insert(backend: DbBackend, item: &Listing) -> Statement {
    let row = listing::ActiveModel {
        id: Set(item.id.clone()),
        title: Set(item.title.clone()),
        year: Set(item.year.clone()),
        r#type: Set(item.kind.clone()),
        poster_url: Set(item.poster_url.clone()),
        active: Set(item.active),
        description: Set(item.description.clone()),
        location: Set(item.location.clone()),
    };
    listing::Entity::insert(row).build(backend)
}

/// Full replace of the seven mutable columns of the row keyed by `id`.
///
/// Every column is bound as given, so a missing title or year reaches the
/// store as NULL and is rejected there.
pub fn update(backend: DbBackend, id: &str, payload: &ListingPayload) -> Statement {
    use listing::Column;

    listing::Entity::update_many()
        .col_expr(Column::Title, Expr::value(payload.title.clone()))
        .col_expr(Column::Year, Expr::value(payload.year.clone()))
        .col_expr(Column::Type, Expr::value(payload.kind.clone()))
        .col_expr(Column::PosterUrl, Expr::value(payload.poster_url.clone()))
        .col_expr(Column::Active, Expr::value(payload.active))
        .col_expr(Column::Description, Expr::value(payload.description.clone()))
        .col_expr(Column::Location, Expr::value(payload.location.clone()))
        .filter(Column::Id.eq(id))
        .build(backend)
}

/// Maps listing operations onto SQL and runs them over the shared connection.
#[derive(Clone)]
pub struct ListingService {
    provider: ConnectionProvider,
}

impl ListingService {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    pub async fn list(&self) -> Result<Vec<Listing>, StoreError> {
        let db = self.provider.ready().await?;
        let rows = listing::Entity::find()
            .from_raw_sql(select_all(db.get_database_backend()))
            .all(&db)
            .await?;
        Ok(rows.into_iter().map(Listing::from).collect())
    }

    pub async fn create(&self, listing: &Listing) -> Result<(), StoreError> {
        let db = self.provider.ready().await?;
        db.execute(insert(db.get_database_backend(), listing)).await?;
        Ok(())
    }

    /// Returns the number of rows the update touched.
    pub async fn update(&self, id: &str, payload: &ListingPayload) -> Result<u64, StoreError> {
        let db = self.provider.ready().await?;
        let result = db.execute(update(db.get_database_backend(), id, payload)).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::ConnectOptions;

    use super::*;
    use crate::db;

    fn titanes() -> Listing {
        Listing {
            id: "tt80000".into(),
            title: "Titanes del Atlantico".into(),
            year: "2013".into(),
            kind: Some("Ciencia Ficcion".into()),
            poster_url: None,
            active: Some(true),
            description: None,
            location: Some("POPCINEMA".into()),
        }
    }

    fn bound_values(stmt: &Statement) -> usize {
        stmt.values.as_ref().map(|v| v.0.len()).unwrap_or(0)
    }

    async fn service() -> ListingService {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1);
        let conn = db::connect_and_migrate(options, true).await.unwrap();
        ListingService::new(ConnectionProvider::from_connection(conn))
    }

    #[test]
    fn insert_binds_all_eight_columns() {
        let stmt = insert(DbBackend::Sqlite, &titanes());
        assert!(stmt.sql.starts_with(r#"INSERT INTO "listings""#), "{}", stmt.sql);
        assert_eq!(bound_values(&stmt), 8);
    }

    #[test]
    fn update_binds_seven_columns_and_the_key() {
        let stmt = update(DbBackend::Sqlite, "tt80000", &ListingPayload::default());
        assert!(stmt.sql.starts_with(r#"UPDATE "listings" SET"#), "{}", stmt.sql);
        assert!(stmt.sql.contains(r#"WHERE "listings"."id" = ?"#), "{}", stmt.sql);
        assert!(!stmt.sql.contains(r#""id" = ?,"#), "{}", stmt.sql);
        assert_eq!(bound_values(&stmt), 8);
    }

    #[test]
    fn select_all_has_no_filter() {
        let stmt = select_all(DbBackend::Sqlite);
        assert!(stmt.sql.starts_with("SELECT"));
        assert!(!stmt.sql.contains("WHERE"));
        assert_eq!(bound_values(&stmt), 0);
    }

    #[tokio::test]
    async fn create_then_list_round_trips_fields() {
        let service = service().await;
        assert!(service.list().await.unwrap().is_empty());

        service.create(&titanes()).await.unwrap();
        assert_eq!(service.list().await.unwrap(), vec![titanes()]);
    }

    #[tokio::test]
    async fn duplicate_key_is_a_query_error() {
        let service = service().await;
        service.create(&titanes()).await.unwrap();

        let mut again = titanes();
        again.title = "Otro".into();
        let err = service.create(&again).await.unwrap_err();
        assert!(matches!(err, StoreError::Query(_)), "{err:?}");
        assert_eq!(service.list().await.unwrap(), vec![titanes()]);
    }

    #[tokio::test]
    async fn update_reports_rows_affected() {
        let service = service().await;
        service.create(&titanes()).await.unwrap();

        let payload = ListingPayload {
            title: Some("New Title".into()),
            year: Some("2020".into()),
            ..Default::default()
        };
        assert_eq!(service.update("tt80000", &payload).await.unwrap(), 1);
        assert_eq!(service.update("does-not-exist", &payload).await.unwrap(), 0);

        let rows = service.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "New Title");
        assert_eq!(rows[0].kind, None);
        assert_eq!(rows[0].location, None);
    }

    #[tokio::test]
    async fn update_without_title_is_rejected_by_the_store() {
        let service = service().await;
        service.create(&titanes()).await.unwrap();

        let err = service.update("tt80000", &ListingPayload::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Query(_)), "{err:?}");
        assert_eq!(service.list().await.unwrap(), vec![titanes()]);
    }
}
