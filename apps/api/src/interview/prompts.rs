// Prompt templates for the interview flow.
// Placeholders are substituted with `str::replace`.

/// Number of questions requested per interview.
pub const QUESTION_COUNT: usize = 5;

pub const QUESTION_GENERATION_PROMPT: &str = "\
You are an interview coach.

Based on the candidate resume below, create exactly {count} technical interview questions.
Focus on skills, projects, and experience mentioned in the resume.
Return only questions, one per line, without extra explanation.

Resume:
{resume}
";

pub const ANSWER_EVALUATION_PROMPT: &str = "\
Question: {question}
Candidate Answer: {answer}

Begin your reply with a line of the form \"Score: N/10\", then evaluate:
- Technical correctness
- Communication clarity
- Confidence level
- Suggest improvements
";

pub fn question_generation_prompt(resume_text: &str) -> String {
    QUESTION_GENERATION_PROMPT
        .replace("{count}", &QUESTION_COUNT.to_string())
        .replace("{resume}", resume_text)
}

pub fn answer_evaluation_prompt(question: &str, answer: &str) -> String {
    ANSWER_EVALUATION_PROMPT
        .replace("{question}", question)
        .replace("{answer}", answer)
}
