use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::config::Config;
use crate::error::DbError;
use crate::models::{Client, ClientQuery, ClientUpdate, NewClient, Phone};

/// Database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(config.database_url())
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an already-connected pool supplied by the caller
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    // Schema operations

    /// Create the clients and phones tables if they do not exist yet
    pub async fn init_schema(&self) -> Result<(), DbError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clients (
                id SERIAL PRIMARY KEY,
                first_name VARCHAR(50) NOT NULL,
                last_name VARCHAR(50) NOT NULL,
                email VARCHAR(100) UNIQUE NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS phones (
                id SERIAL PRIMARY KEY,
                client_id INTEGER NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
                phone_number VARCHAR(20) NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("schema initialized");

        Ok(())
    }

    /// Drop both tables, phones first so the foreign key never dangles
    pub async fn drop_schema(&self) -> Result<(), DbError> {
        sqlx::query("DROP TABLE IF EXISTS phones")
            .execute(&self.pool)
            .await?;

        sqlx::query("DROP TABLE IF EXISTS clients")
            .execute(&self.pool)
            .await?;

        debug!("schema dropped");

        Ok(())
    }

    // Client operations

    /// Insert a client and its initial phone numbers, returning the new id.
    ///
    /// The client row and its phone rows are written in one transaction, so
    /// a failing phone insert leaves nothing behind. A duplicate email
    /// surfaces as [`DbError::UniqueViolation`].
    pub async fn add_client(&self, client: &NewClient) -> Result<i32, DbError> {
        let mut tx = self.pool.begin().await?;

        let client_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO clients (first_name, last_name, email)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.email)
        .fetch_one(&mut *tx)
        .await?;

        for phone in &client.phones {
            sqlx::query("INSERT INTO phones (client_id, phone_number) VALUES ($1, $2)")
                .bind(client_id)
                .bind(phone)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!(client_id, phones = client.phones.len(), "client created");

        Ok(client_id)
    }

    /// Attach one phone number to an existing client, returning the phone id.
    ///
    /// A `client_id` that references no client surfaces as
    /// [`DbError::ForeignKeyViolation`].
    pub async fn add_phone(&self, client_id: i32, phone_number: &str) -> Result<i32, DbError> {
        let phone_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO phones (client_id, phone_number)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(client_id)
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(phone_id)
    }

    /// Apply a partial update to a client.
    ///
    /// Only staged fields are written; a fully empty update issues no
    /// statements at all. When `phones` is staged the stored phone set is
    /// deleted and replaced with the provided list, all inside the same
    /// transaction as the column update. Returns the number of client rows
    /// matched by the column update (0 when no columns were staged or the
    /// id is unknown; neither case is an error).
    pub async fn change_client(
        &self,
        client_id: i32,
        update: &ClientUpdate,
    ) -> Result<u64, DbError> {
        if update.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut rows_updated = 0;

        if update.has_field_changes() {
            let mut builder = QueryBuilder::<Postgres>::new("UPDATE clients SET ");
            let mut assignments = builder.separated(", ");

            if let Some(first_name) = &update.first_name {
                assignments.push("first_name = ");
                assignments.push_bind_unseparated(first_name.as_str());
            }
            if let Some(last_name) = &update.last_name {
                assignments.push("last_name = ");
                assignments.push_bind_unseparated(last_name.as_str());
            }
            if let Some(email) = &update.email {
                assignments.push("email = ");
                assignments.push_bind_unseparated(email.as_str());
            }

            builder.push(" WHERE id = ");
            builder.push_bind(client_id);

            rows_updated = builder.build().execute(&mut *tx).await?.rows_affected();
        }

        if let Some(phones) = &update.phones {
            // Full replace, not a merge
            sqlx::query("DELETE FROM phones WHERE client_id = $1")
                .bind(client_id)
                .execute(&mut *tx)
                .await?;

            for phone in phones {
                sqlx::query("INSERT INTO phones (client_id, phone_number) VALUES ($1, $2)")
                    .bind(client_id)
                    .bind(phone)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        debug!(client_id, rows_updated, "client changed");

        Ok(rows_updated)
    }

    /// Delete every phone row matching the client and number exactly.
    ///
    /// Returns the number of rows removed; 0 when nothing matched.
    pub async fn delete_phone(&self, client_id: i32, phone_number: &str) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM phones WHERE client_id = $1 AND phone_number = $2")
            .bind(client_id)
            .bind(phone_number)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete a client; the cascade removes its phones.
    ///
    /// Returns the number of client rows removed; 0 when the id is unknown.
    pub async fn delete_client(&self, client_id: i32) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(client_id)
            .execute(&self.pool)
            .await?;

        debug!(client_id, removed = result.rows_affected(), "client deleted");

        Ok(result.rows_affected())
    }

    // Query operations

    /// Search for clients, each returned with its full phone list.
    ///
    /// With a phone filter the match is restricted to clients owning at
    /// least one equal number. Otherwise the provided name/email filters are
    /// combined with OR; a query with no filters returns an empty set
    /// without touching the database.
    pub async fn find_clients(&self, query: &ClientQuery) -> Result<Vec<Client>, DbError> {
        if let Some(phone) = &query.phone {
            let clients = sqlx::query_as::<_, Client>(
                r#"
                SELECT c.id, c.first_name, c.last_name, c.email,
                       COALESCE(
                           ARRAY_AGG(p.phone_number ORDER BY p.id) FILTER (WHERE p.phone_number IS NOT NULL),
                           '{}'
                       ) AS phones
                FROM clients c
                LEFT JOIN phones p ON p.client_id = c.id
                WHERE c.id IN (SELECT client_id FROM phones WHERE phone_number = $1)
                GROUP BY c.id
                ORDER BY c.id
                "#,
            )
            .bind(phone)
            .fetch_all(&self.pool)
            .await?;

            return Ok(clients);
        }

        if query.has_no_field_filters() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT c.id, c.first_name, c.last_name, c.email,
                   COALESCE(
                       ARRAY_AGG(p.phone_number ORDER BY p.id) FILTER (WHERE p.phone_number IS NOT NULL),
                       '{}'
                   ) AS phones
            FROM clients c
            LEFT JOIN phones p ON p.client_id = c.id
            WHERE
            "#,
        );
        let mut predicates = builder.separated(" OR ");

        if let Some(first_name) = &query.first_name {
            predicates.push("c.first_name = ");
            predicates.push_bind_unseparated(first_name.as_str());
        }
        if let Some(last_name) = &query.last_name {
            predicates.push("c.last_name = ");
            predicates.push_bind_unseparated(last_name.as_str());
        }
        if let Some(email) = &query.email {
            predicates.push("c.email = ");
            predicates.push_bind_unseparated(email.as_str());
        }

        builder.push(" GROUP BY c.id ORDER BY c.id");

        let clients = builder
            .build_query_as::<Client>()
            .fetch_all(&self.pool)
            .await?;

        Ok(clients)
    }

    /// Fetch a single client by id with its aggregated phone list
    pub async fn get_client(&self, client_id: i32) -> Result<Option<Client>, DbError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT c.id, c.first_name, c.last_name, c.email,
                   COALESCE(
                       ARRAY_AGG(p.phone_number ORDER BY p.id) FILTER (WHERE p.phone_number IS NOT NULL),
                       '{}'
                   ) AS phones
            FROM clients c
            LEFT JOIN phones p ON p.client_id = c.id
            WHERE c.id = $1
            GROUP BY c.id
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// List the phone rows belonging to one client
    pub async fn phones_for_client(&self, client_id: i32) -> Result<Vec<Phone>, DbError> {
        let phones = sqlx::query_as::<_, Phone>(
            "SELECT id, client_id, phone_number FROM phones WHERE client_id = $1 ORDER BY id ASC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(phones)
    }
}

/// Initialize the database connection pool
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;

    Ok(db)
}
