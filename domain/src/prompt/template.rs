//! Prompt templates for the three deliberation stages

use crate::council::anonymize::AnonymizedBundle;
use crate::council::value_objects::{CouncilAnswer, CouncilReview};

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the opinion stage
    pub fn opinion_system() -> &'static str {
        r#"You are a knowledgeable advisor on a council that deliberates on difficult questions.
Your task is to provide a thoughtful, well-reasoned answer to the question.
Identify the key considerations, the risks, and concrete criteria for judging success.
Be direct, thorough, and honest. Do not hedge unnecessarily.
Aim for 200-400 words."#
    }

    /// User prompt for the opinion stage
    pub fn opinion_query(question: &str) -> String {
        format!(
            r#"Please answer the following question:

{question}

Provide a clear, well-structured response."#
        )
    }

    /// System prompt for the review stage
    pub fn review_system() -> &'static str {
        r#"You are evaluating answers to the same question from other AI models.
The models are anonymized as Model A, Model B, and so on. Do not play favorites.
Evaluate reasoning quality: Are claims supported? Are risks identified with viable
mitigations? Are the criteria specific enough to be actionable?
Be fair but thorough, and identify both strengths and weaknesses."#
    }

    /// User prompt for the review stage, built from one reviewer's
    /// anonymized bundle
    pub fn review_prompt(question: &str, bundle: &AnonymizedBundle) -> String {
        let labels = bundle.labels().join(", ");
        format!(
            r#"Original question: {question}

Here are answers from other advisors:

{answers}

Please:
1. Rank these answers from strongest to weakest ({labels}) based on clarity, risk coverage, and actionability
2. Note any significant disagreements between them
3. Identify gaps: missing risks, vague claims, or unsupported conclusions
Be specific and critical. 150-300 words."#,
            answers = bundle.to_prompt_block(),
        )
    }

    /// System prompt for the synthesis stage
    pub fn synthesis_system() -> &'static str {
        r#"You are the chairman of an advisory council. Your job is to distill multiple perspectives into one cohesive verdict. Output only valid JSON, no markdown code blocks."#
    }

    /// User prompt for the synthesis stage.
    ///
    /// The chairman sees real identities. When `reviews` is empty the peer
    /// review section is omitted entirely rather than left as an empty
    /// placeholder.
    pub fn synthesis_prompt(
        question: &str,
        answers: &[CouncilAnswer],
        reviews: &[CouncilReview],
    ) -> String {
        let answers_block = answers
            .iter()
            .map(|a| format!("**{}:**\n{}", a.councilor.label, a.answer))
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut prompt = format!(
            r#"You are the Chairman of an advisory council. Your council was asked:

**QUESTION:** {question}

---

**INDIVIDUAL ANSWERS:**

{answers_block}

---

"#
        );

        if !reviews.is_empty() {
            let reviews_block = reviews
                .iter()
                .map(|r| format!("**{}'s review of others:**\n{}", r.reviewer.label, r.review))
                .collect::<Vec<_>>()
                .join("\n\n");
            prompt.push_str(&format!("**PEER REVIEWS:**\n\n{reviews_block}\n\n---\n\n"));
        }

        prompt.push_str(Self::synthesis_format_instruction());
        prompt
    }

    /// The fixed JSON output contract for the chairman
    fn synthesis_format_instruction() -> &'static str {
        r#"Your job: Synthesize all perspectives into a unified verdict. Produce a response in the following JSON format (and ONLY JSON, no markdown wrapper):

{
  "summary": "A 300-600 word synthesis. What the question is, why it matters, and the recommended answer. Draw on the best insights from all advisors. Be definitive.",
  "key_points": ["Point all advisors agreed on", "Another point..."],
  "success_criteria": [
    {
      "metric": "What to measure",
      "target": "Specific target or threshold",
      "rationale": "Why this metric matters"
    }
  ],
  "risks": [
    {
      "risk": "Description of the risk",
      "severity": "high|medium|low",
      "mitigation": "How to mitigate this risk"
    }
  ],
  "disagreements": [
    {
      "topic": "Short label for what advisors disagreed on",
      "summary": "What the disagreement was and why it matters",
      "chairman_verdict": "Your take on which position is stronger and why"
    }
  ],
  "confidence": "high|medium|low",
  "confidence_note": "Brief note on confidence level"
}"#
    }
}
