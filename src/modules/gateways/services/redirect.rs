use crate::core::{AppError, Result};
use crate::modules::payments::PaymentId;
use url::Url;

/// Where the payer (or provider) is sent after a gateway operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// Off-site, to the provider's payment page
    Away(String),
    PaymentSuccess(PaymentId),
    PaymentCancel(PaymentId),
    /// Host dashboard with an error banner
    Dashboard { error: String },
    /// Server-to-server notification; answer 200 and stay put
    Acknowledge,
}

impl Redirect {
    /// Absolute URL to send the client to, `None` for acknowledgements
    pub fn location(&self, urls: &HostUrls) -> Option<String> {
        match self {
            Redirect::Away(url) => Some(url.clone()),
            Redirect::PaymentSuccess(id) => Some(urls.success_url(*id)),
            Redirect::PaymentCancel(id) => Some(urls.cancel_url(*id)),
            Redirect::Dashboard { error } => Some(urls.dashboard_url(Some(error))),
            Redirect::Acknowledge => None,
        }
    }
}

/// Host routes the adapters hand to providers and redirect payers to
#[derive(Debug, Clone)]
pub struct HostUrls {
    base: Url,
}

impl HostUrls {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| AppError::configuration(format!("Invalid APP_URL {}: {}", base, e)))?;
        if base.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "APP_URL {} cannot be a base URL",
                base
            )));
        }
        Ok(Self { base })
    }

    fn route(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Where the provider calls back (or returns the payer) for `endpoint`
    pub fn return_url(&self, endpoint: &str) -> String {
        self.route(&["payment", "return", endpoint]).to_string()
    }

    pub fn cancel_url(&self, payment_id: PaymentId) -> String {
        self.route(&["payment", "cancel", &payment_id.to_string()])
            .to_string()
    }

    pub fn success_url(&self, payment_id: PaymentId) -> String {
        self.route(&["payment", "success", &payment_id.to_string()])
            .to_string()
    }

    pub fn dashboard_url(&self, error: Option<&str>) -> String {
        let mut url = self.route(&["dashboard"]);
        if let Some(error) = error {
            url.query_pairs_mut().append_pair("error", error);
        }
        url.to_string()
    }
}
