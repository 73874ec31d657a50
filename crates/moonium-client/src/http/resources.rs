/*
[INPUT]:  Resource identifiers (admin id, project slug, wallet, contract addresses)
[OUTPUT]: Admins, projects, users, NFTs and CSV exports
[POS]:    HTTP layer - resource endpoints consumed by the presentation layer
[UPDATE]: When adding resource endpoints or changing query constraints
*/

use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};

use crate::http::{CondOperator, CrudQuery, MooniumClient, MooniumError, Result};
use crate::types::{Admin, Nft, Project, SortOrder, User, UserUpsert};

impl MooniumClient {
    /// Fetch an admin by id
    ///
    /// GET /admins/{id}
    pub async fn get_admin(&self, id: &str) -> Result<Admin> {
        let builder = self.segment_request(Method::GET, &["admins", id])?;
        let (status, body) = self.send_raw(builder).await?;
        if status != StatusCode::OK {
            return Err(MooniumError::NotFound(format!("admin {id}")));
        }
        serde_json::from_str::<Option<Admin>>(&body)
            .ok()
            .flatten()
            .ok_or_else(|| MooniumError::NotFound(format!("admin {id}")))
    }

    /// Fetch a project by slug, joined with its contracts
    ///
    /// GET /projects/{slug}?join=contracts
    pub async fn get_project(&self, slug: &str) -> Result<Project> {
        let query = CrudQuery::new().join("contracts", &[]);
        let builder = self
            .segment_request(Method::GET, &["projects", slug])?
            .query(query.params());
        self.send_json(builder).await
    }

    /// Fetch the registered user owning a wallet
    ///
    /// GET /users/{wallet}
    pub async fn get_user(&self, wallet: &str) -> Result<User> {
        let builder = self.segment_request(Method::GET, &["users", wallet])?;
        self.send_json(builder).await
    }

    /// Insert or update a user record
    ///
    /// POST /users
    pub async fn upsert_user(&self, user: &UserUpsert) -> Result<User> {
        let builder = self.request(Method::POST, "/users")?.json(user);
        self.send_json(builder).await
    }

    /// List the NFTs a wallet owns among the given contracts, oldest first
    ///
    /// GET /nfts?filter=owner_wallet||$eq||{wallet}&filter=contract.address||$in||{..}
    pub async fn list_owned_nfts(&self, wallet: &str, contracts: &[String]) -> Result<Vec<Nft>> {
        let query = CrudQuery::new()
            .filter("owner_wallet", CondOperator::Equals, wallet)
            .filter_in("contract.address", contracts)
            .join("contract", &[])
            .sort("created_at", SortOrder::Asc);
        let builder = self.request(Method::GET, "/nfts")?.query(query.params());
        self.send_json(builder).await
    }

    /// Export every NFT minted by the given contracts with its registered owner
    ///
    /// GET /nfts/export (Accept: text/csv)
    pub async fn export_nft_owners(
        &self,
        contracts: &[String],
        access_token: Option<&str>,
    ) -> Result<String> {
        let query = CrudQuery::new()
            .select(&["name"])
            .join("contract", &["name", "symbol"])
            .join("owner", &["wallet", "name", "surname", "email", "phone"])
            .filter_in("contract.address", contracts)
            .sort("owner.wallet", SortOrder::Asc);
        let builder = self
            .authorized_request(Method::GET, "/nfts/export", access_token)?
            .header(ACCEPT, "text/csv")
            .query(query.params());
        let (status, body) = self.send_raw(builder).await?;
        if status != StatusCode::OK {
            return Err(MooniumError::api_error(status, body));
        }
        Ok(body)
    }
}
