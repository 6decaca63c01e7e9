//! Provider dashboard endpoints: bookings, services, calendar, reviews,
//! KYC and stats.

use std::path::Path;

use reqwest::{
    multipart::{Form, Part},
    Method,
};
use serde::Serialize;

use crate::{
    domain::{
        booking::{Booking, BookingAction, BookingStatus},
        calendar::{BlockTimeRequest, CalendarEvent, TimeRange},
        catalog::{Service, ServiceDraft},
        kyc::{file_name_of, KycDocumentType},
        review::Review,
        stats::ProviderStats,
    },
    usecases::{
        bookings::BookingsSource, calendar::CalendarSource, catalog::CatalogSource,
        contracts::RemoteError, kyc::KycSource, reviews::ReviewsSource, stats::StatsSource,
    },
};

use super::{client::HttpApi, path_segment};

#[derive(Debug, Serialize)]
struct RejectBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RateCustomerBody<'a> {
    rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceStatusBody {
    is_active: bool,
}

#[derive(Debug, Serialize)]
struct ReplyBody<'a> {
    reply: &'a str,
}

#[derive(Debug, Serialize)]
struct ReportBody<'a> {
    reason: &'a str,
}

impl BookingsSource for HttpApi {
    fn list_bookings(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, RemoteError> {
        let mut request = self.request(Method::GET, "/provider/bookings");
        if let Some(status) = status {
            request = request.query(&[("status", status.as_label())]);
        }
        Ok(self.fetch(request)?)
    }

    fn transition_booking(
        &self,
        booking_id: &str,
        action: BookingAction,
        reason: Option<&str>,
    ) -> Result<(), RemoteError> {
        let path = format!(
            "/provider/bookings/{}/{}",
            path_segment(booking_id),
            action.path_segment()
        );
        let mut request = self.request(Method::POST, &path);
        if action == BookingAction::Reject {
            request = request.json(&RejectBody { reason });
        }
        Ok(self.execute(request)?)
    }

    fn rate_customer(
        &self,
        booking_id: &str,
        rating: u8,
        comment: Option<&str>,
    ) -> Result<(), RemoteError> {
        let path = format!("/provider/bookings/{}/rate-customer", path_segment(booking_id));
        let body = RateCustomerBody { rating, comment };
        Ok(self.execute(self.request(Method::POST, &path).json(&body))?)
    }
}

impl CatalogSource for HttpApi {
    fn list_services(&self) -> Result<Vec<Service>, RemoteError> {
        Ok(self.fetch(self.request(Method::GET, "/provider/services"))?)
    }

    fn create_service(&self, draft: &ServiceDraft) -> Result<Service, RemoteError> {
        Ok(self.fetch(self.request(Method::POST, "/provider/services").json(draft))?)
    }

    fn update_service(&self, service_id: &str, draft: &ServiceDraft) -> Result<Service, RemoteError> {
        let path = format!("/provider/services/{}", path_segment(service_id));
        Ok(self.fetch(self.request(Method::PUT, &path).json(draft))?)
    }

    fn delete_service(&self, service_id: &str) -> Result<(), RemoteError> {
        let path = format!("/provider/services/{}", path_segment(service_id));
        Ok(self.execute(self.request(Method::DELETE, &path))?)
    }

    fn set_service_active(&self, service_id: &str, active: bool) -> Result<(), RemoteError> {
        let path = format!("/provider/services/{}/status", path_segment(service_id));
        let body = ServiceStatusBody { is_active: active };
        Ok(self.execute(self.request(Method::PATCH, &path).json(&body))?)
    }
}

impl CalendarSource for HttpApi {
    fn list_events(&self, range: Option<TimeRange>) -> Result<Vec<CalendarEvent>, RemoteError> {
        let mut request = self.request(Method::GET, "/provider/calendar");
        if let Some(range) = range {
            request = request.query(&[
                ("start", range.start.to_rfc3339()),
                ("end", range.end.to_rfc3339()),
            ]);
        }
        Ok(self.fetch(request)?)
    }

    fn block_time(&self, block: &BlockTimeRequest) -> Result<(), RemoteError> {
        Ok(self.execute(self.request(Method::POST, "/provider/calendar/block").json(block))?)
    }

    fn unblock_time(&self, block_id: &str) -> Result<(), RemoteError> {
        let path = format!("/provider/calendar/block/{}", path_segment(block_id));
        Ok(self.execute(self.request(Method::DELETE, &path))?)
    }
}

impl ReviewsSource for HttpApi {
    fn list_reviews(&self) -> Result<Vec<Review>, RemoteError> {
        Ok(self.fetch(self.request(Method::GET, "/provider/reviews"))?)
    }

    fn reply_to_review(&self, review_id: &str, reply: &str) -> Result<(), RemoteError> {
        let path = format!("/provider/reviews/{}/reply", path_segment(review_id));
        Ok(self.execute(self.request(Method::POST, &path).json(&ReplyBody { reply }))?)
    }

    fn report_review(&self, review_id: &str, reason: &str) -> Result<(), RemoteError> {
        let path = format!("/provider/reviews/{}/report", path_segment(review_id));
        Ok(self.execute(self.request(Method::POST, &path).json(&ReportBody { reason }))?)
    }
}

impl KycSource for HttpApi {
    /// Multipart upload with the file under `document` and its kind under
    /// `type`.
    fn upload_document(&self, doc_type: KycDocumentType, path: &Path) -> Result<(), RemoteError> {
        let bytes = std::fs::read(path).map_err(|error| {
            RemoteError::Rejected(format!("cannot read {}: {error}", path.display()))
        })?;
        let form = Form::new()
            .text("type", doc_type.as_wire())
            .part("document", Part::bytes(bytes).file_name(file_name_of(path)));

        Ok(self.execute(self.request(Method::POST, "/kyc/upload").multipart(form))?)
    }
}

impl StatsSource for HttpApi {
    fn fetch_stats(&self) -> Result<ProviderStats, RemoteError> {
        Ok(self.fetch(self.request(Method::GET, "/provider/stats"))?)
    }
}
