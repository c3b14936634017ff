use chautari_core::{DisplayModel, Surface, Widget};
use chrono::Local;

/// Prints each applied model to stdout.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl Surface for TerminalSurface {
    fn apply(&self, widget: &Widget, model: &DisplayModel) {
        let stamp = Local::now().format("%H:%M:%S");
        println!("[{stamp}] {}", format_model(widget, model));
    }
}

pub fn format_model(widget: &Widget, model: &DisplayModel) -> String {
    match model {
        DisplayModel::Unavailable { message } => format!("{}: {message}", widget.id),
        DisplayModel::Weather {
            temperature,
            description,
            humidity,
            wind,
            forecast,
            ..
        } => {
            let mut out = format!("{}: {temperature}", widget.id);
            if !description.is_empty() {
                out.push_str(&format!(" {description}"));
            }

            let details: Vec<&str> = [humidity, wind].into_iter().flatten().map(String::as_str).collect();
            if !details.is_empty() {
                out.push_str(&format!("\n    {}", details.join("  ")));
            }

            if !forecast.is_empty() {
                let days: Vec<String> = forecast
                    .iter()
                    .map(|cell| format!("{} {}", cell.date, cell.range))
                    .collect();
                out.push_str(&format!("\n    {}", days.join(" | ")));
            }

            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chautari_core::{WeatherPayload, render};

    #[test]
    fn formats_weather() {
        let widget = Widget::new("kathmandu", 27.7172, 85.324);
        let text = format_model(&widget, &render(Some(&WeatherPayload::demo())));

        assert_eq!(
            text,
            "kathmandu: 22°C Clear sky\n    Humidity: 65%  Wind: 3.5 m/s\n    \
             Today 25° / 18° | Tomorrow 23° / 16° | Day 3 24° / 17°"
        );
    }

    #[test]
    fn formats_fallback() {
        let widget = Widget::new("a", 0.0, 0.0);
        assert_eq!(
            format_model(&widget, &DisplayModel::unavailable()),
            "a: Weather data unavailable"
        );
    }
}
