//! A toy weather tool. It makes no API call; conditions are simulated from
//! the city's first letter.
use super::{Tool, ToolError};
use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use std::ops::Range;

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherParams {
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl WeatherParams {
    fn location(&self) -> String {
        match self.country.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(country) => format!("{}, {}", self.city.trim(), country),
            None => self.city.trim().to_string(),
        }
    }
}

/// Condition name with its temperature (°C) and humidity (%) ranges.
struct Climate {
    condition: &'static str,
    temperature: Range<i32>,
    humidity: Range<i32>,
}

fn climate_for(city: &str) -> Climate {
    let first = city
        .trim()
        .chars()
        .next()
        .map(|c| c.to_ascii_lowercase())
        .unwrap_or(' ');

    match first {
        'a'..='e' => Climate {
            condition: "Sunny",
            temperature: 25..35,
            humidity: 40..60,
        },
        'f'..='j' => Climate {
            condition: "Cloudy",
            temperature: 15..25,
            humidity: 60..80,
        },
        'k'..='o' => Climate {
            condition: "Rainy",
            temperature: 10..20,
            humidity: 80..95,
        },
        'p'..='t' => Climate {
            condition: "Windy",
            temperature: 5..20,
            humidity: 50..80,
        },
        _ => Climate {
            condition: "Variable",
            temperature: 0..30,
            humidity: 20..100,
        },
    }
}

#[derive(Debug, Default)]
pub struct WeatherTool;

impl WeatherTool {
    pub fn new() -> Self {
        Self
    }

    /// Builds the report as JSON.
    pub fn report(&self, params: &WeatherParams, rng: &mut impl Rng) -> Value {
        let climate = climate_for(&params.city);
        let temperature = rng.gen_range(climate.temperature);
        let humidity = rng.gen_range(climate.humidity);
        let location = params.location();

        json!({
            "location": location,
            "current": {
                "condition": climate.condition,
                "temperature": temperature,
                "humidity": humidity,
            },
            "forecast": format!(
                "In {} the weather is {} with a temperature of {}°C and humidity of {}%.",
                location,
                climate.condition.to_lowercase(),
                temperature,
                humidity
            ),
        })
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Gets the current weather for a city and, optionally, its country"
    }

    async fn call(&self, input: Value) -> Result<String, ToolError> {
        let params: WeatherParams = serde_json::from_value(input)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        if params.city.trim().is_empty() {
            return Err(ToolError::InvalidArguments("city must not be empty".to_string()));
        }

        let report = self.report(&params, &mut rand::thread_rng());
        Ok(serde_json::to_string_pretty(&report)?)
    }
}
