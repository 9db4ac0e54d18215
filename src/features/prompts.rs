// Instruction templates for each feature
// Author: kelexine (https://github.com/kelexine)

use crate::vision::MediaKind;

pub const SYMPTOMS_INSTRUCTIONS: &str = "\
As a veterinary AI assistant, analyze these pet symptoms and provide a preliminary assessment. \
The response should be structured as follows:

1. Possible Conditions
   - List potential conditions that match the symptoms
   - Order from most to least likely
   - Include brief explanations for each

2. Severity Assessment
   - Indicate urgency level (Emergency, Urgent, Non-urgent)
   - Explain why this urgency level was chosen
   - List any red flags that require immediate attention

3. Recommendations
   - Immediate care steps owners can take
   - Whether veterinary care is needed and how soon
   - Preventive measures to avoid worsening

4. Important Notes
   - Any crucial warnings or considerations
   - Symptoms to watch for that would indicate worsening
   - When to seek emergency care

Remember this is a preliminary assessment only. Always recommend consulting with a veterinarian \
for proper diagnosis and treatment.

Analyze these symptoms: ";

pub const FIRST_AID_INSTRUCTIONS: &str = "\
As a veterinary first aid expert, provide clear, step-by-step emergency guidance for the following \
pet emergency situation. Structure the response as follows:

1. Initial Assessment
   - Immediate danger signs to check
   - Quick vital signs to monitor
   - Signs that indicate severity

2. Emergency Steps
   - Numbered, clear steps to take immediately
   - What to do while waiting for veterinary care
   - What NOT to do (common mistakes)

3. When to Seek Emergency Care
   - Clear indicators for emergency vet visit
   - Signs of worsening condition
   - Maximum wait time before professional care

4. Prevention Tips
   - How to prevent similar situations
   - Warning signs to watch for
   - Preparation recommendations

IMPORTANT: Always emphasize that this is first aid guidance only and does not replace professional \
veterinary care.

Emergency situation: ";

pub const BEHAVIOR_INSTRUCTIONS: &str = "\
As a professional pet behaviorist, analyze this behavioral issue and provide detailed training \
guidance. Structure the response as follows:

1. Behavior Analysis
   - Root causes of the behavior
   - Common triggers and patterns
   - Impact on pet's well-being
   - Environmental factors

2. Training Plan
   - Step-by-step training exercises
   - Positive reinforcement techniques
   - Timeline for improvement
   - Required tools or resources

3. Prevention Strategies
   - Environmental modifications
   - Daily routine adjustments
   - Alternative behaviors to encourage
   - Management techniques

4. Progress Tracking
   - Success indicators
   - Milestones to monitor
   - When to adjust the approach
   - Signs of improvement

Remember to emphasize positive reinforcement and force-free training methods. For serious \
behavioral issues, always recommend consulting with a professional trainer or behaviorist.

Analyze this behavior: ";

/// Build the full prompt for a text feature.
///
/// The user's text is passed through as typed (only trimmed); normalization
/// is for cache keys, not for what the model sees.
pub fn text_prompt(instructions: &str, input: &str) -> String {
    format!("{}{}", instructions, input.trim())
}

/// Build the analysis prompt for an uploaded photo or video
pub fn media_prompt(kind: MediaKind) -> String {
    let video = kind == MediaKind::Video;
    let extra = |lines: &str| if video { format!("\n{}", lines) } else { String::new() };

    format!(
        "Analyze this pet {noun} and provide a comprehensive analysis in clear, plain text without \
any special formatting or markdown characters. Focus on:

1. Emotional State & Mood
   - Facial expressions (relaxed vs. tense)
   - Body posture and positioning
   - Eye contact and blinking patterns
   - Overall emotional indicators
   - Stress or comfort signals{mood}

2. Physical Health Assessment
   - Visible health issues or concerns
   - Coat and skin condition
   - Weight and body condition
   - Any visible injuries or abnormalities{health}

3. Environmental Analysis
   - Potential hazards or stressors in the environment
   - Comfort level in current surroundings
   - Interaction with environment{environment}

4. Recommendations
   - Suggestions for improving emotional well-being
   - Health-related recommendations
   - Environmental adjustments if needed{recommendations}

Format the response in clear sections with descriptive headings. Provide specific observations and \
actionable recommendations. Keep the tone informative but approachable.",
        noun = if video { "video" } else { "photo" },
        mood = extra("   - Changes in behavior over time\n   - Vocalizations and sounds"),
        health = extra("   - Movement patterns and gait\n   - Energy levels"),
        environment = extra("   - Response to environmental changes\n   - Social interactions if present"),
        recommendations = extra("   - Behavioral training suggestions if applicable"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_prompt_appends_trimmed_input() {
        let prompt = text_prompt(SYMPTOMS_INSTRUCTIONS, "  My Dog is vomiting  ");
        assert!(prompt.starts_with("As a veterinary AI assistant"));
        assert!(prompt.ends_with("Analyze these symptoms: My Dog is vomiting"));
    }

    #[test]
    fn test_each_feature_has_own_instructions() {
        assert!(text_prompt(FIRST_AID_INSTRUCTIONS, "x").contains("first aid expert"));
        assert!(text_prompt(BEHAVIOR_INSTRUCTIONS, "x").contains("force-free"));
    }

    #[test]
    fn test_video_prompt_has_extra_sections() {
        let photo = media_prompt(MediaKind::Image);
        let video = media_prompt(MediaKind::Video);

        assert!(photo.contains("Analyze this pet photo"));
        assert!(!photo.contains("Movement patterns"));
        assert!(video.contains("Analyze this pet video"));
        assert!(video.contains("Movement patterns and gait"));
        assert!(video.contains("Behavioral training suggestions"));
    }
}
