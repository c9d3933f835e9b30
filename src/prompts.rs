// SPDX-License-Identifier: MPL-2.0
//! Built-in analysis prompt templates.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    MeetingMinutes,
    GeneralAnalysis,
    SceneBreakdown,
    TechnicalReview,
    Custom,
}

impl PromptTemplate {
    pub const ALL: [PromptTemplate; 5] = [
        PromptTemplate::MeetingMinutes,
        PromptTemplate::GeneralAnalysis,
        PromptTemplate::SceneBreakdown,
        PromptTemplate::TechnicalReview,
        PromptTemplate::Custom,
    ];

    /// The prompt text for this template, or `None` for [`Custom`]
    /// (the user supplies their own text).
    ///
    /// [`Custom`]: PromptTemplate::Custom
    pub fn text(&self) -> Option<&'static str> {
        match self {
            PromptTemplate::MeetingMinutes => Some(MEETING_MINUTES),
            PromptTemplate::GeneralAnalysis => Some(GENERAL_ANALYSIS),
            PromptTemplate::SceneBreakdown => Some(SCENE_BREAKDOWN),
            PromptTemplate::TechnicalReview => Some(TECHNICAL_REVIEW),
            PromptTemplate::Custom => None,
        }
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PromptTemplate::MeetingMinutes => "Meeting minutes",
            PromptTemplate::GeneralAnalysis => "General analysis",
            PromptTemplate::SceneBreakdown => "Scene breakdown",
            PromptTemplate::TechnicalReview => "Technical review",
            PromptTemplate::Custom => "Custom prompt",
        };
        f.write_str(label)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        PromptTemplate::MeetingMinutes
    }
}

const MEETING_MINUTES: &str = "\
Watch this meeting recording and produce structured minutes.

Include:
1. Meeting summary (2-3 sentences)
2. Key discussion points, in order
3. Decisions made
4. Action items with owners where identifiable
5. Open questions carried forward

Base everything strictly on what is said or shown in the video. \
Do not invent names or details that are not present.";

const GENERAL_ANALYSIS: &str = "\
Analyze this video and describe its content in detail.

Cover:
1. Overall summary of what happens
2. Key moments with approximate timestamps
3. People, objects, and settings that appear
4. Any spoken content, summarized

Be factual and concise.";

const SCENE_BREAKDOWN: &str = "\
Break this video down scene by scene.

For each scene give:
- Approximate start and end timestamps
- What happens visually
- Any dialogue or narration, summarized
- Transitions between scenes

Present the result as an ordered list.";

const TECHNICAL_REVIEW: &str = "\
Review this screen recording or technical demonstration.

Describe:
1. What software or system is shown
2. The steps performed, in order
3. Any errors, warnings, or unexpected behavior visible
4. Suggestions implied by what is demonstrated

Reference on-screen text where it is legible.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_templates_have_text() {
        for template in PromptTemplate::ALL {
            match template {
                PromptTemplate::Custom => assert!(template.text().is_none()),
                other => assert!(!other.text().unwrap().is_empty()),
            }
        }
    }

    #[test]
    fn default_is_meeting_minutes() {
        assert_eq!(PromptTemplate::default(), PromptTemplate::MeetingMinutes);
    }

    #[test]
    fn labels_are_unique() {
        let labels: Vec<String> = PromptTemplate::ALL.iter().map(|t| t.to_string()).collect();
        let mut deduped = labels.clone();
        deduped.dedup();
        assert_eq!(labels, deduped);
    }
}
