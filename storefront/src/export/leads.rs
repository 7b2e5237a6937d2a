//! Customer lead spreadsheet export

use chrono::NaiveDate;

use shared::error::AppResult;
use shared::models::Lead;

use super::sheet::SheetWriter;
use super::{date_label, yes_no};

pub const LEAD_HEADERS: [&str; 13] = [
    "Customer ID",
    "Name",
    "Email",
    "Phone",
    "Street Address",
    "City",
    "State",
    "PIN Code",
    "Country",
    "Signup Source",
    "Profile Complete",
    "Registered On",
    "Last Updated",
];

pub fn leads_file_name(date: NaiveDate) -> String {
    format!("PremiumVerse_Leads_{}.csv", date.format("%Y-%m-%d"))
}

fn phone_label(lead: &Lead) -> String {
    if lead.phone.is_empty() {
        String::new()
    } else {
        format!("{} {}", lead.country_code, lead.phone)
    }
}

pub fn leads_to_csv(leads: &[Lead]) -> AppResult<String> {
    let mut writer = SheetWriter::new();
    writer.write_row(LEAD_HEADERS)?;
    for lead in leads {
        writer.write_row([
            lead.customer_id.to_string(),
            lead.name.clone(),
            lead.email.clone(),
            phone_label(lead),
            lead.street.clone(),
            lead.city.clone(),
            lead.state.clone(),
            lead.pincode.clone(),
            lead.country.clone(),
            lead.auth_provider.label().to_string(),
            yes_no(lead.is_address_complete).to_string(),
            date_label(lead.created_at),
            date_label(lead.updated_at),
        ])?;
    }
    writer.finish()
}
