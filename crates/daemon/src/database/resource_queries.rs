use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::types::Json;
use sqlx::Row;

use common::prelude::{Claim, Resource, ResourceStore, Visibility};

use crate::database::Database;

fn resource_from_row(row: &SqliteRow) -> Resource {
    let visibility: String = row.get("visibility");
    let Json(content): Json<serde_json::Value> = row.get("content");
    Resource {
        bundle: row.get("bundle"),
        filename: row.get("filename"),
        owner: row.get("owner"),
        visibility: Visibility::from_stored(&visibility),
        content,
    }
}

/// Insert a bundle row unless one exists. Returns whether this call created it.
async fn insert_bundle(
    conn: &mut SqliteConnection,
    bundle: &str,
    owner: &str,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO bundles (name, owner)
        VALUES (?1, ?2)
        ON CONFLICT(name) DO NOTHING
        "#,
    )
    .bind(bundle)
    .bind(owner)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    Ok(inserted > 0)
}

async fn write_resource(
    conn: &mut SqliteConnection,
    resource: &Resource,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO resources (bundle, filename, owner, visibility, content)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(bundle, filename) DO UPDATE SET
            owner = excluded.owner,
            visibility = excluded.visibility,
            content = excluded.content,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&resource.bundle)
    .bind(&resource.filename)
    .bind(&resource.owner)
    .bind(resource.visibility.as_str())
    .bind(Json(&resource.content))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[async_trait]
impl ResourceStore for Database {
    type Error = sqlx::Error;

    async fn bundle_owner(&self, bundle: &str) -> Result<Option<String>, Self::Error> {
        let row = sqlx::query(
            r#"
            SELECT owner FROM bundles WHERE name = ?1
            "#,
        )
        .bind(bundle)
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(|r| r.get("owner")))
    }

    async fn create_resource(&self, resource: &Resource) -> Result<Claim, Self::Error> {
        let mut tx = self.begin().await?;

        if !insert_bundle(&mut *tx, &resource.bundle, &resource.owner).await? {
            let owner: String = sqlx::query(
                r#"
                SELECT owner FROM bundles WHERE name = ?1
                "#,
            )
            .bind(&resource.bundle)
            .fetch_one(&mut *tx)
            .await?
            .get("owner");

            tx.rollback().await?;
            return Ok(Claim::Taken { owner });
        }

        // Dropping the transaction on error rolls the bundle row back too
        write_resource(&mut *tx, resource).await?;
        tx.commit().await?;
        Ok(Claim::Created)
    }

    async fn get_resource(
        &self,
        bundle: &str,
        filename: &str,
    ) -> Result<Option<Resource>, Self::Error> {
        let row = sqlx::query(
            r#"
            SELECT bundle, filename, owner, visibility, content
            FROM resources
            WHERE bundle = ?1 AND filename = ?2
            "#,
        )
        .bind(bundle)
        .bind(filename)
        .fetch_optional(&**self)
        .await?;

        Ok(row.as_ref().map(resource_from_row))
    }

    async fn list_resources(&self, bundle: &str) -> Result<Vec<Resource>, Self::Error> {
        let rows = sqlx::query(
            r#"
            SELECT bundle, filename, owner, visibility, content
            FROM resources
            WHERE bundle = ?1
            ORDER BY rowid ASC
            "#,
        )
        .bind(bundle)
        .fetch_all(&**self)
        .await?;

        Ok(rows.iter().map(resource_from_row).collect())
    }

    async fn upsert_resource(&self, resource: Resource) -> Result<(), Self::Error> {
        let mut tx = self.begin().await?;

        // A direct upsert into an unknown bundle still establishes its owner
        insert_bundle(&mut *tx, &resource.bundle, &resource.owner).await?;
        write_resource(&mut *tx, &resource).await?;

        tx.commit().await?;
        Ok(())
    }
}
