//! CSV renderers for the history and analytics exports.

use anyhow::anyhow;
use chrono::NaiveDateTime;
use csv::WriterBuilder;

use crate::{
    models::appointments::Appointment,
    query::{DailyCount, IssueCount},
    session::SessionContext,
    utils::{format_date, format_timestamp, DATE_FMT},
};

pub const HISTORY_COLUMNS: [&str; 7] = [
    "Date",
    "Time Slot",
    "Client Name",
    "Issue Type",
    "Problem Description",
    "Location",
    "Contact",
];

pub fn history_csv(appointments: &[Appointment]) -> anyhow::Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(HISTORY_COLUMNS)?;
    for appointment in appointments {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        writer.write_record([
            format_date(appointment.created_at.as_ref()),
            text(&appointment.time_slot),
            text(&appointment.name),
            text(&appointment.intent),
            text(&appointment.problem_description),
            text(&appointment.location),
            text(&appointment.contact),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing history csv: {}", e.error()))
}

/// Who the analytics report is for and when it was produced.
pub struct ReportHeader<'a> {
    pub session: &'a SessionContext,
    pub generated_at: NaiveDateTime,
    pub window_days: u32,
}

pub fn analytics_csv(
    header: &ReportHeader<'_>,
    daily: &[DailyCount],
    issues: &[IssueCount],
) -> anyhow::Result<Vec<u8>> {
    let session = header.session;
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(["Analytics Report"])?;
    writer.write_record(["Generated on:", format_timestamp(&header.generated_at).as_str()])?;
    writer.write_record(["Technician:", session.technician_name.as_str()])?;
    writer.write_record([
        "Expertise:",
        session.technician_expertise.as_deref().unwrap_or(""),
    ])?;
    writer.write_record([
        "Location:",
        session.technician_location.as_deref().unwrap_or(""),
    ])?;
    writer.write_record([""])?;

    writer.write_record([format!(
        "Daily Appointments (Last {} Days)",
        header.window_days
    )])?;
    writer.write_record(["Date", "Number of Appointments"])?;
    for row in daily {
        writer.write_record([row.date.format(DATE_FMT).to_string(), row.count.to_string()])?;
    }
    writer.write_record([""])?;

    writer.write_record(["Issue Types Distribution"])?;
    writer.write_record(["Issue Type", "Number of Appointments"])?;
    for row in issues {
        writer.write_record([row.intent.clone(), row.count.to_string()])?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing analytics csv: {}", e.error()))
}
