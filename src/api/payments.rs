use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::errors::AppResult;
use crate::models::{CheckoutTarget, Package, PaymentSession, PaymentStatus, PurchaseRequest, UserPackage};
use crate::services::payment::CheckoutGateway;

impl ApiClient {
    pub async fn available_packages(&self) -> AppResult<Vec<Package>> {
        Self::send_json(self.request(Method::GET, "packages/available")).await
    }

    pub async fn my_packages(&self) -> AppResult<Vec<UserPackage>> {
        Self::send_json(self.request(Method::GET, "packages/mine")).await
    }
}

#[async_trait]
impl CheckoutGateway for ApiClient {
    async fn create_checkout(&self, target: &CheckoutTarget) -> AppResult<PaymentSession> {
        let req = match target {
            CheckoutTarget::Booking { booking_id, kind } => {
                let path = format!("booking-payment/{booking_id}/{}/checkout", kind.as_str());
                self.request(Method::POST, &path)
            }
            CheckoutTarget::Package { package_id } => self
                .request(Method::POST, "packages/purchase/checkout")
                .json(&PurchaseRequest {
                    package_id: *package_id,
                }),
        };
        Self::send_json(req).await
    }

    async fn payment_status(&self, target: &CheckoutTarget, order_code: &str) -> AppResult<PaymentStatus> {
        let path = match target {
            CheckoutTarget::Booking { .. } => format!("booking-payment/{order_code}/status"),
            CheckoutTarget::Package { .. } => format!("packages/payment-status/{order_code}"),
        };
        let raw = Self::send_text(self.request(Method::GET, &path)).await?;
        Ok(PaymentStatus::parse(&raw))
    }
}
