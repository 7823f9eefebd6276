use crate::assessment::report::FinalReport;
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    pub fn get_final_report(&self, username: &str) -> Result<Option<FinalReport>, StoreError> {
        Self::get_json(&self.final_reports, &keys::final_report_key(username))
    }

    pub fn set_final_report(&self, username: &str, report: &FinalReport) -> Result<(), StoreError> {
        Self::put_json(&self.final_reports, &keys::final_report_key(username), report)
    }
}
