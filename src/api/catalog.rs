use chrono::NaiveDate;
use reqwest::Method;

use super::{backend_date, ApiClient};
use crate::errors::AppResult;
use crate::models::{Court, Facility, Slot, SportType, Tier};

#[derive(Debug, Clone, PartialEq)]
pub struct FacilityQuery {
    pub sport_type_id: Option<i64>,
    pub date: NaiveDate,
    pub tier: Tier,
}

impl ApiClient {
    pub async fn sport_types(&self) -> AppResult<Vec<SportType>> {
        Self::send_json(self.request(Method::GET, "sport-types")).await
    }

    pub async fn search_facilities(&self, query: &FacilityQuery) -> AppResult<Vec<Facility>> {
        let mut params = vec![
            ("date", backend_date(query.date)),
            ("bookingType", query.tier.to_string()),
        ];
        if let Some(id) = query.sport_type_id {
            params.push(("sportTypeId", id.to_string()));
        }
        let req = self
            .request(Method::GET, "search/facilities")
            .query(&params);
        Self::send_json(req).await
    }

    pub async fn facility_courts(&self, facility_id: i64) -> AppResult<Vec<Court>> {
        let path = format!("search/facilities/{facility_id}/courts");
        Self::send_json(self.request(Method::GET, &path)).await
    }

    pub async fn court_slots(&self, court_id: i64, date: NaiveDate, tier: Tier) -> AppResult<Vec<Slot>> {
        let path = format!("courts/{court_id}/slots");
        let req = self
            .request(Method::GET, &path)
            .query(&[("date", backend_date(date)), ("bookingType", tier.to_string())]);
        Self::send_json(req).await
    }
}
