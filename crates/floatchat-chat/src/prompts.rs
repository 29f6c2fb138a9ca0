//! Prefilled questions offered as one-click shortcuts beside the chat input.

use serde::Serialize;

/// A shortcut label and the text it fills into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickPrompt {
    pub label: &'static str,
    pub text: &'static str,
}

pub static QUICK_PROMPTS: &[QuickPrompt] = &[
    QuickPrompt {
        label: "Salinity Data",
        text: "Show me salinity profiles near the equator",
    },
    QuickPrompt {
        label: "Find Floats",
        text: "Find ARGO floats near 20°N, 70°E",
    },
    QuickPrompt {
        label: "BGC Analysis",
        text: "Compare BGC parameters in Arabian Sea",
    },
    QuickPrompt {
        label: "Export Data",
        text: "Export temperature data to NetCDF",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::ResponseDispatcher;
    use crate::types::Topic;

    #[test]
    fn test_prompt_labels() {
        let labels: Vec<&str> = QUICK_PROMPTS.iter().map(|p| p.label).collect();
        assert_eq!(
            labels,
            vec!["Salinity Data", "Find Floats", "BGC Analysis", "Export Data"]
        );
    }

    #[test]
    fn test_prompts_resolve_to_topics() {
        let d = ResponseDispatcher::default();
        let topics: Vec<Option<Topic>> = QUICK_PROMPTS.iter().map(|p| d.classify(p.text)).collect();
        assert_eq!(
            topics,
            vec![
                Some(Topic::Salinity),
                Some(Topic::Location),
                Some(Topic::Bgc),
                // "temperature" outranks "export".
                Some(Topic::Temperature),
            ]
        );
    }

    #[test]
    fn test_prompt_json_shape() {
        let json = serde_json::to_value(QUICK_PROMPTS[0]).unwrap();
        assert_eq!(json["label"], "Salinity Data");
        assert_eq!(json["text"], "Show me salinity profiles near the equator");
    }
}
