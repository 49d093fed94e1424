/// Configuration for LLM requests.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f64,

    /// Maximum tokens to generate.
    pub max_tokens: u32,

    /// Request JSON format output from the model.
    pub json_mode: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
            json_mode: false,
        }
    }
}

impl LlmConfig {
    /// Settings for the story call: creative, JSON output.
    pub fn creative_json() -> Self {
        Self::default().with_temperature(0.7).with_json_mode(true)
    }

    /// Settings for the refiner call: deterministic free text.
    pub fn deterministic() -> Self {
        Self::default().with_temperature(0.0)
    }

    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }

    pub fn with_json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let story = LlmConfig::creative_json();
        assert!((story.temperature - 0.7).abs() < f64::EPSILON);
        assert!(story.json_mode);

        let refine = LlmConfig::deterministic();
        assert_eq!(refine.temperature, 0.0);
        assert!(!refine.json_mode);
    }
}
