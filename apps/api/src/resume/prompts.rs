// Prompt templates for résumé structuring.

pub const RESUME_EXTRACTION_PROMPT: &str = "\
Extract the following from this resume:
- Skills
- Projects
- Experience
- Education

Resume:
{resume_text}

Return JSON only, as an object with the keys \"skills\", \"projects\", \"experience\" and \"education\".
";

pub fn resume_extraction_prompt(resume_text: &str) -> String {
    RESUME_EXTRACTION_PROMPT.replace("{resume_text}", resume_text)
}
