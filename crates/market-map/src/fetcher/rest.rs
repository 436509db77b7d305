use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{MarketMapApiHandler, MarketMapFetcher};
use crate::context::FetchContext;
use crate::errors::FetchError;
use crate::http::RequestHandler;
use crate::models::{Chain, FetchResponse, MarketMapResponse};

/// Source fetcher that GETs one document and hands it to an api handler.
pub struct RestApiFetcher {
    handler: Arc<dyn MarketMapApiHandler>,
    request_handler: Arc<dyn RequestHandler>,
}

impl RestApiFetcher {
    pub fn new(
        handler: Arc<dyn MarketMapApiHandler>,
        request_handler: Arc<dyn RequestHandler>,
    ) -> Self {
        Self {
            handler,
            request_handler,
        }
    }
}

#[async_trait]
impl MarketMapFetcher for RestApiFetcher {
    fn name(&self) -> &str {
        self.handler.name()
    }

    async fn fetch(&self, ctx: &FetchContext, chains: &[Chain]) -> MarketMapResponse {
        let url = match self.handler.create_url(chains) {
            Ok(url) => url,
            Err(err) => {
                warn!(handler = self.name(), error = %err, "no url for requested chains");
                return FetchResponse::with_err(chains, err);
            }
        };

        let response = match ctx.run(self.request_handler.get(&url)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) | Err(err) => {
                warn!(handler = self.name(), url = %url, error = %err, "market-map request failed");
                return FetchResponse::with_err(chains, err);
            }
        };

        if !response.is_ok() {
            warn!(handler = self.name(), url = %url, status = response.status, "unexpected status");
            return FetchResponse::with_err(
                chains,
                FetchError::decode(format!("unexpected status {} from {url}", response.status)),
            );
        }

        debug!(handler = self.name(), bytes = response.body.len(), "received market-map document");

        let mut result = self.handler.parse_response(chains, &response.body);
        let name = self.name();
        result.fill_missing(chains, |chain| {
            FetchError::invalid_scope(format!("chain {chain} is not served by {name}"))
        });
        result
    }
}
