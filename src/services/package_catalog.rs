use std::sync::Arc;

use crate::api::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::{CheckoutTarget, Package, UserPackage};

#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    pub available: Vec<Package>,
    pub mine: Vec<UserPackage>,
    pub error: Option<String>,
}

pub struct PackageCatalog {
    api: Arc<ApiClient>,
    view: CatalogView,
}

impl PackageCatalog {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            view: CatalogView::default(),
        }
    }

    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    /// Loads purchasable packages and the user's own packages together.
    pub async fn load(&mut self) -> AppResult<()> {
        self.view.error = None;
        let (available, mine) = tokio::join!(self.api.available_packages(), self.api.my_packages());

        match (available, mine) {
            (Ok(available), Ok(mine)) => {
                self.view.available = available.into_iter().filter(|p| p.is_active).collect();
                self.view.mine = mine;
                Ok(())
            }
            (Err(e), _) | (_, Err(e)) => {
                self.view.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn refresh_mine(&mut self) -> AppResult<()> {
        match self.api.my_packages().await {
            Ok(mine) => {
                self.view.mine = mine;
                Ok(())
            }
            Err(e) => {
                self.view.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn checkout_target(&self, package_id: i64) -> AppResult<CheckoutTarget> {
        if !self.view.available.iter().any(|p| p.id == package_id) {
            return Err(AppError::NotFound(format!(
                "package {package_id} is not available for purchase"
            )));
        }
        Ok(CheckoutTarget::Package { package_id })
    }
}
