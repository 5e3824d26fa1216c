//! PostgREST table access.
//!
//! Writes mirror the `insert(..).select().single()` chain the admin panel
//! relies on: `Prefer: return=representation` plus the PostgREST "single
//! object" `Accept` header, so every write answers with the affected row
//! as a plain JSON object (and fails when it affected zero rows).

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Supabase, SupabaseError};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

impl Supabase {
    /// Read all rows of a table in the given order (e.g. `created_at.desc`).
    pub async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
        order: &str,
    ) -> Result<Vec<T>, SupabaseError> {
        let request = self
            .rest_request(Method::GET, table)
            .query(&[("select", "*"), ("order", order)]);

        self.execute(request).await
    }

    /// Read the rows matching one equality filter, with a column projection.
    pub async fn select_eq<T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
        select: &str,
    ) -> Result<Vec<T>, SupabaseError> {
        let filter = format!("eq.{value}");
        let request = self
            .rest_request(Method::GET, table)
            .query(&[("select", select), (column, filter.as_str())]);

        self.execute(request).await
    }

    /// Read a table expected to hold exactly one row.
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
    ) -> Result<T, SupabaseError> {
        let request = self
            .rest_request(Method::GET, table)
            .query(&[("select", "*")])
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT);

        self.execute(request).await
    }

    /// Insert one row and return it as stored.
    pub async fn insert<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<T, SupabaseError> {
        let request = self
            .rest_request(Method::POST, table)
            .header("Prefer", "return=representation")
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
            .json(row);

        self.execute(request).await
    }

    /// Update the row with the given id and return it as stored.
    pub async fn update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        table: &str,
        id: i32,
        row: &B,
    ) -> Result<T, SupabaseError> {
        let request = self
            .rest_request(Method::PATCH, table)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
            .json(row);

        self.execute(request).await
    }

    /// Delete the row with the given id. Deleting an absent id is a no-op.
    pub async fn delete(&self, table: &str, id: i32) -> Result<(), SupabaseError> {
        let request = self
            .rest_request(Method::DELETE, table)
            .query(&[("id", format!("eq.{id}"))]);

        self.execute_empty(request).await
    }
}
