// src/format.rs - Text rendering for the exported files
use crate::snapshot::{PrinterStatusSnapshot, TemperatureReading, TemperatureSnapshot};

const NOZZLE_TOOL: &str = "tool0";
const BED_TOOL: &str = "bed";

/// Compact duration text, largest nonzero unit first: `90` -> `1m30s`,
/// `90000` -> `1d1h0m0s`.
pub fn format_duration(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = seconds % 86_400 / 3_600;
    let minutes = seconds % 3_600 / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{}d{}h{}m{}s", days, hours, minutes, secs)
    } else if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

// One decimal, ties away from zero, right-aligned to width 5.
fn format_celsius(value: Option<f64>) -> String {
    let rounded = (value.unwrap_or(0.0) * 10.0).round() / 10.0;
    format!("{:>5.1}", rounded)
}

fn temperature_line(label: &str, reading: &TemperatureReading) -> String {
    format!(
        "{}{}°C of {}°C",
        label,
        format_celsius(reading.actual),
        format_celsius(reading.target)
    )
}

/// Render the temperature file: a nozzle line and a bed line, each only when
/// the snapshot carries that heater.
pub fn render_temperature(snapshot: Option<&TemperatureSnapshot>) -> String {
    let Some(temps) = snapshot else {
        return String::new();
    };

    let mut lines = Vec::with_capacity(2);
    if let Some(nozzle) = temps.get(NOZZLE_TOOL) {
        lines.push(temperature_line("nozzle: ", nozzle));
    }
    if let Some(bed) = temps.get(BED_TOOL) {
        lines.push(temperature_line("bed:    ", bed));
    }
    lines.join("\n")
}

/// Percentage shown on the status file. Zero unless both times are known and
/// nonzero.
pub fn progress_percent(print_time: Option<u64>, print_time_left: Option<u64>) -> f64 {
    match (print_time, print_time_left) {
        (Some(elapsed), Some(left)) if elapsed > 0 && left > 0 => {
            100.0 * elapsed as f64 / (elapsed as f64 + left as f64)
        }
        _ => 0.0,
    }
}

/// Render the status file.
///
/// A snapshot without any section renders like a missing one. When no job is
/// active the state line is pushed down by four blank lines so consumers that
/// show the last lines of the file clear the job block.
pub fn render_status(snapshot: Option<&PrinterStatusSnapshot>) -> String {
    let Some(status) = snapshot.filter(|s| !s.is_empty()) else {
        return String::new();
    };

    let mut data = String::new();
    let mut active = false;

    if let Some(state) = &status.state {
        active = state.flags.is_active();
        data.push_str("state:   ");
        data.push_str(&state.text.to_lowercase());
    }

    if !active {
        return format!("\n\n\n\n{}", data);
    }

    data.push('\n');

    if let Some(job) = &status.job {
        let name = job
            .file
            .as_ref()
            .and_then(|file| file.name.as_deref())
            .unwrap_or("-");
        data.push_str("file:    ");
        data.push_str(name);
        data.push('\n');
    }

    if let Some(progress) = &status.progress {
        let elapsed = progress.print_time.map(format_duration);
        let left = progress.print_time_left.map(format_duration);
        let percent = progress_percent(progress.print_time, progress.print_time_left);

        data.push_str(&format!("elapsed: {}\n", elapsed.as_deref().unwrap_or("0s")));
        data.push_str(&format!("left:    {}\n", left.as_deref().unwrap_or("0s")));
        data.push_str(&format!("percent: {:.1}%", percent));
    }

    data
}
