/*
[INPUT]:  Parsed subcommand, app configuration, persisted session store
[OUTPUT]: Command results written to the given output
[POS]:    CLI layer - subcommand execution over moonium-client
[UPDATE]: When adding subcommands or changing their output
*/

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use moonium_client::wallet::WALLET_INFO_KEY;
use moonium_client::{
    AppConfig, AuthManager, Credentials, KeyValueStore, MooniumClient, Notifier, Project,
    TokenStore, Translator, WalletInfo,
};

use crate::cli::Command;

const STORE_FILE: &str = "session.json";

/// Everything a subcommand needs, built once per invocation
pub struct App {
    config: AppConfig,
    client: MooniumClient,
    store: Arc<dyn KeyValueStore>,
    translator: Arc<Translator>,
    notifier: Arc<dyn Notifier>,
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WalletSummary<'a> {
    wallet: &'a str,
    chain_id: &'a str,
    blockchain: String,
    explorer_url: Option<String>,
}

impl App {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        json: bool,
    ) -> Result<Self> {
        let client = MooniumClient::with_config(config.client_config(), &config.api_url)
            .context("build API client")?;
        let translator = Arc::new(Translator::new(config.locale));
        Ok(Self {
            config,
            client,
            store,
            translator,
            notifier,
            json,
        })
    }

    pub async fn run(&self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Login { email, password } => self.login(email, password, out).await,
            Command::Logout => {
                self.auth().logout();
                writeln!(out, "logged out")?;
                Ok(())
            }
            Command::Whoami => self.whoami(out).await,
            Command::Wallet => self.wallet(out),
            Command::Project { slug } => {
                let project = self.project(slug).await?;
                self.print_project(&project, out)
            }
            Command::Nfts { wallet, slug } => self.nfts(&wallet, slug, out).await,
            Command::Export { out: path } => self.export(&path, out).await,
        }
    }

    fn auth(&self) -> AuthManager {
        AuthManager::new(
            self.client.clone(),
            TokenStore::new(Arc::clone(&self.store)),
            Arc::clone(&self.translator),
            Arc::clone(&self.notifier),
        )
    }

    async fn login(&self, email: String, password: String, out: &mut impl Write) -> Result<()> {
        let admin = self
            .auth()
            .login(&Credentials::new(email, password))
            .await
            .context("login")?;
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&admin)?)?;
        } else {
            writeln!(out, "logged in as {} {}", admin.name, admin.surname)?;
        }
        Ok(())
    }

    async fn whoami(&self, out: &mut impl Write) -> Result<()> {
        let state = self.auth().initialize().await;
        match state.admin {
            Some(admin) if self.json => writeln!(out, "{}", serde_json::to_string_pretty(&admin)?)?,
            Some(admin) => writeln!(out, "{} {} <{}>", admin.name, admin.surname, admin.email)?,
            None if state.error.is_empty() => bail!("not logged in"),
            None => bail!("{}", state.error),
        }
        Ok(())
    }

    fn wallet(&self, out: &mut impl Write) -> Result<()> {
        let info = match self.store.get(WALLET_INFO_KEY) {
            Some(blob) => WalletInfo::from_persisted(&blob).context("read wallet session")?,
            None => WalletInfo::Disconnected,
        };
        let Some(connected) = info.as_connected() else {
            writeln!(out, "no wallet connected")?;
            return Ok(());
        };

        let summary = WalletSummary {
            wallet: &connected.wallet,
            chain_id: &connected.chain_id,
            blockchain: connected.blockchain.to_string(),
            explorer_url: connected.explorer_url(),
        };
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        } else {
            writeln!(out, "{} on {} ({})", summary.wallet, summary.blockchain, summary.chain_id)?;
            if let Some(url) = summary.explorer_url {
                writeln!(out, "{url}")?;
            }
        }
        Ok(())
    }

    async fn project(&self, slug: Option<String>) -> Result<Project> {
        let slug = slug
            .or_else(|| self.config.project_slug())
            .context("no project slug: pass --slug or configure project_slug/hostname")?;
        self.client
            .get_project(&slug)
            .await
            .with_context(|| format!("fetch project {slug}"))
    }

    fn print_project(&self, project: &Project, out: &mut impl Write) -> Result<()> {
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(project)?)?;
            return Ok(());
        }
        writeln!(out, "{} ({}) theme {}", project.name, project.slug, project.theme_color())?;
        for contract in &project.contracts {
            writeln!(out, "  {} {} {}", contract.symbol, contract.name, contract.address)?;
        }
        Ok(())
    }

    async fn nfts(&self, wallet: &str, slug: Option<String>, out: &mut impl Write) -> Result<()> {
        let project = self.project(slug).await?;
        let nfts = self
            .client
            .list_owned_nfts(wallet, &project.contract_addresses())
            .await
            .context("list owned NFTs")?;

        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&nfts)?)?;
            return Ok(());
        }
        if nfts.is_empty() {
            writeln!(out, "no NFTs owned in {}", project.name)?;
        }
        for nft in &nfts {
            writeln!(out, "{} {}", nft.token_id, nft.name)?;
        }
        Ok(())
    }

    async fn export(&self, path: &Path, out: &mut impl Write) -> Result<()> {
        let auth = self.auth();
        let state = auth.initialize().await;
        let Some(admin) = state.admin else {
            bail!("export requires an admin session; run `moonium login` first");
        };

        let contracts = match admin.project {
            Some(project) if !project.contracts.is_empty() => project.contract_addresses(),
            _ => self.project(None).await?.contract_addresses(),
        };
        let csv = self
            .client
            .export_nft_owners(&contracts, auth.access_token().as_deref())
            .await
            .context("export NFT owners")?;

        std::fs::write(path, &csv).with_context(|| format!("write {}", path.display()))?;
        writeln!(out, "exported {} rows to {}", csv.lines().count().saturating_sub(1), path.display())?;
        Ok(())
    }
}

/// Session file location: configured data dir, else the platform data dir
pub fn store_path(config: &AppConfig) -> Result<PathBuf> {
    let dir = match &config.data_dir {
        Some(dir) => dir.clone(),
        None => dirs::data_dir()
            .context("no platform data directory; set data_dir")?
            .join("moonium"),
    };
    Ok(dir.join(STORE_FILE))
}
