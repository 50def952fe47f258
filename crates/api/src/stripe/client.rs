//! Minimal Stripe REST client.
//!
//! Only the three calls the platform needs: creating a customer, creating a
//! payment intent, and retrieving a payment method for its card display
//! fields. Requests are form-encoded with the secret key as HTTP basic-auth
//! username, per the Stripe API convention.

use pureflow_core::error::CoreError;
use pureflow_core::types::DbId;
use serde::Deserialize;

use crate::config::StripeConfig;

/// Stripe REST client bound to one secret key.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

/// A Stripe customer, reduced to the fields we store.
#[derive(Debug, Deserialize)]
pub struct StripeCustomer {
    pub id: String,
}

/// A Stripe payment intent, reduced to the fields we use.
#[derive(Debug, Deserialize)]
pub struct StripePaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub amount: i64,
}

/// A Stripe payment method; `card` is present for card methods.
#[derive(Debug, Deserialize)]
pub struct StripePaymentMethod {
    pub id: String,
    pub card: Option<StripeCard>,
}

/// Card display fields from a payment method.
#[derive(Debug, Deserialize)]
pub struct StripeCard {
    pub last4: String,
    pub brand: String,
}

/// Error envelope Stripe wraps failures in.
#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl StripeClient {
    /// Build a client from config. Returns `None` when no secret key is set.
    pub fn from_config(config: &StripeConfig) -> Option<Self> {
        let secret_key = config.secret_key.clone()?;
        Some(Self {
            http: reqwest::Client::new(),
            secret_key,
            api_base: config.api_base.clone(),
        })
    }

    /// Create a Stripe customer for a local user.
    pub async fn create_customer(
        &self,
        email: &str,
        name: &str,
        user_id: DbId,
    ) -> Result<StripeCustomer, CoreError> {
        let params = [
            ("email", email.to_string()),
            ("name", name.to_string()),
            ("metadata[user_id]", user_id.to_string()),
        ];
        self.post("/v1/customers", &params).await
    }

    /// Create a payment intent for one billing period.
    ///
    /// `amount` is in the smallest currency unit (cents). The user and
    /// subscription ids ride along as metadata so the webhook can correlate
    /// the result back to local rows.
    pub async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        customer_id: Option<&str>,
        user_id: DbId,
        subscription_id: DbId,
    ) -> Result<StripePaymentIntent, CoreError> {
        let mut params = vec![
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("metadata[user_id]", user_id.to_string()),
            ("metadata[subscription_id]", subscription_id.to_string()),
        ];
        if let Some(customer_id) = customer_id {
            params.push(("customer", customer_id.to_string()));
            // Save the card for recurring charges.
            params.push(("setup_future_usage", "off_session".to_string()));
        }
        self.post("/v1/payment_intents", &params).await
    }

    /// Retrieve a payment method for its card display fields.
    pub async fn retrieve_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<StripePaymentMethod, CoreError> {
        let url = format!("{}/v1/payment_methods/{payment_method_id}", self.api_base);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await
            .map_err(|e| CoreError::Downstream(e.to_string()))?;
        Self::decode(response).await
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CoreError> {
        let url = format!("{}{path}", self.api_base);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(params)
            .send()
            .await
            .map_err(|e| CoreError::Downstream(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CoreError> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| CoreError::Downstream(format!("Invalid gateway response: {e}")))
        } else {
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            Err(CoreError::Downstream(message))
        }
    }
}
