pub mod relay_client;
#[cfg(test)]
pub(crate) mod stub_server;
pub mod vision_client;

pub use relay_client::RelayClient;
pub use vision_client::{DescribeRequest, DescriptionClient, OpenAiVisionClient};

use crate::config::Config;

/// Pick the client for the configured variant: the relay server when a relay
/// URL is set, otherwise the model provider directly.
pub fn client_for(config: &Config) -> Box<dyn DescriptionClient> {
    match config.relay_url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => Box::new(RelayClient::new(url)),
        None => Box::new(OpenAiVisionClient::new(config)),
    }
}
