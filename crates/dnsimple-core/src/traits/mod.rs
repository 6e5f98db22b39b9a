//! Consumed interfaces
//!
//! The remote systems the library reacts to, expressed as traits so the
//! engine and cache never depend on a concrete HTTP client.
//!
//! - [`RegistrarApi`]: Poll domain registrations and registrant changes
//! - [`ZoneRecordSource`]: List zone records one page at a time

pub mod registrar;
pub mod zone_records;

pub use registrar::{DomainRegistration, RegistrantChange, RegistrarApi};
pub use zone_records::{
    Pagination, ZoneRecord, ZoneRecordListOptions, ZoneRecordPage, ZoneRecordSource,
};
