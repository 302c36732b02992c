//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::classifier::huggingface::{HuggingFace, TOKEN_ENV};
use crate::adapter::outbound::classifier::vader::Vader;
use crate::adapter::outbound::sqlite::database::connection;
use crate::adapter::outbound::sqlite::store::SqliteSentimentStore;
use crate::application::classifier::{HeadlineScorer, SentimentModels};
use crate::application::scan::Scanner;
use crate::application::sentiment::SocialBlend;
use crate::application::social::SocialIngestor;
use crate::domain::score::OpportunityEngine;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::classifier::TextClassifier;
use crate::port::outbound::market::MarketData;
use crate::port::outbound::store::SentimentStore;

/// Build the sentiment models, reading the classifier token from the
/// environment.
///
/// The lexicon fallback is always present. The hosted classifier is added
/// only when `HF_API_TOKEN` is set.
pub fn build_models(config: &Config) -> SentimentModels {
    let token = std::env::var(TOKEN_ENV)
        .ok()
        .filter(|token| !token.trim().is_empty());
    build_models_with_token(config, token)
}

/// Build the sentiment models with an explicit classifier token.
pub fn build_models_with_token(config: &Config, token: Option<String>) -> SentimentModels {
    let models = SentimentModels::default().with_fallback(Arc::new(Vader::new()));

    let Some(token) = token else {
        warn!("{TOKEN_ENV} not set, headline scoring uses the lexicon fallback");
        return models;
    };

    match HuggingFace::new(
        token,
        &config.classifier.endpoint,
        &config.classifier.model,
        config.classifier_timeout(),
    ) {
        Ok(client) => {
            info!(model = client.name(), url = %client.url(), "hosted classifier initialized");
            models.with_primary(Arc::new(client))
        }
        Err(e) => {
            warn!(error = %e, "hosted classifier unavailable, using lexicon fallback");
            models
        }
    }
}

/// Open the SQLite sentiment store, running pending migrations.
///
/// # Errors
///
/// Returns an error if the pool cannot be created or migrations fail.
#[allow(clippy::result_large_err)]
pub fn open_store(config: &Config) -> Result<Arc<SqliteSentimentStore>> {
    let pool = connection::open(&config.database)?;
    info!(database = %config.database, "sentiment store opened");
    Ok(Arc::new(SqliteSentimentStore::new(pool)))
}

/// Wire a scanner from configuration and collaborators.
pub fn build_scanner<S: SentimentStore>(
    config: &Config,
    market: Arc<dyn MarketData>,
    models: SentimentModels,
    store: Arc<S>,
) -> Scanner<S> {
    Scanner::new(
        market,
        HeadlineScorer::new(models, config.scorer_limits()),
        SocialBlend::new(store, config.blend_settings()),
        OpportunityEngine::new(config.scoring),
        config.scan_settings(),
    )
}

/// Wire a social ingestor over `store`.
pub fn build_ingestor<S: SentimentStore>(store: Arc<S>) -> SocialIngestor<S> {
    SocialIngestor::new(store)
}
