use chrono::{DateTime, Local, Utc};
use ipgeolocation_core::{Geolocation, Timezone};
use serde_json::to_string_pretty;

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", to_string_pretty(value)?);
    Ok(())
}

pub fn print_geolocation(geo: &Geolocation) {
    print!("{}", format_geolocation(geo));
}

pub fn print_timezone(tz: &Timezone) {
    print!("{}", format_timezone(tz));
}

fn format_geolocation(geo: &Geolocation) -> String {
    let mut out = Lines::default();
    out.field("Status", &geo.status);
    out.field("Message", &geo.message);
    out.field("IP", &geo.ip);
    out.field("Hostname", &geo.hostname);
    out.field("Location", &join_place(&[&geo.city, &geo.state_prov, &geo.country_name]));
    out.field("Continent", &geo.continent_name);
    out.field("Zip", &geo.zipcode);
    if let Some((lat, long)) = geo.coordinates() {
        out.field("Coordinates", &format!("{lat}, {long}"));
    }
    out.field("ISP", &geo.isp);
    out.field("Organization", &geo.organization);
    out.field("Currency", &geo.currency.code);
    out.field("Time zone", &geo.time_zone.name);
    out.field("Local time", &geo.time_zone.current_time);
    out.finish()
}

fn format_timezone(tz: &Timezone) -> String {
    let mut out = Lines::default();
    out.field("Status", &tz.status);
    out.field("Message", &tz.message);
    out.field("Time zone", &tz.timezone);
    if !tz.timezone.is_empty() {
        out.field("UTC offset", &format!("{:+}", tz.timezone_offset));
        out.field("DST", if tz.is_dst { "yes" } else { "no" });
    }
    out.field("Date/time", &tz.date_time_txt);
    out.field("Your time", &tz.date_time_utc().map(to_local).unwrap_or_default());
    out.field("Location", &join_place(&[&tz.geo.city, &tz.geo.state_prov, &tz.geo.country_name]));
    out.finish()
}

fn to_local(utc: DateTime<Utc>) -> String {
    utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %:z").to_string()
}

fn join_place(parts: &[&str]) -> String {
    parts.iter().filter(|p| !p.is_empty()).copied().collect::<Vec<_>>().join(", ")
}

/// `label: value` lines, skipping empty values.
#[derive(Default)]
struct Lines(String);

impl Lines {
    fn field(&mut self, label: &str, value: &str) {
        if !value.is_empty() {
            self.0.push_str(&format!("{label:<13}{value}\n"));
        }
    }

    fn finish(self) -> String {
        self.0
    }
}
