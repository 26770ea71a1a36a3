// All LLM prompt constants for the generation passes.
// Templates use `{placeholder}` markers filled in by `generation::builder`.

/// System prompt for the cover letter pass.
pub const COVER_LETTER_SYSTEM: &str = "You are a professional career coach specializing in \
    business correspondence. Write ONLY a properly formatted cover letter using standard \
    business letter format. Use clear paragraph breaks. Each paragraph should be \
    well-structured and professional. Do not include ANY analysis, explanations, commentary, \
    word counts, or planning text. Output must start with the greeting and follow proper \
    business letter structure.";

/// Cover letter prompt template. Replace `{resume_text}` and `{job_description}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a professional cover letter with proper business letter formatting.

IMPORTANT: Return ONLY the cover letter text with proper formatting. Do not include any analysis, explanations, or commentary.

Format requirements:
- Start with "Dear Hiring Manager," (or specific name if mentioned in job description)
- Use proper paragraph structure with line breaks between paragraphs
- Include 3-4 well-structured paragraphs:
  1. Opening paragraph: Express interest and mention the position
  2. Body paragraph(s): Highlight relevant experience and skills from resume that match job requirements
  3. Closing paragraph: Express enthusiasm and next steps
- End with professional closing: "Sincerely," followed by "[Your Name]"
- Keep concise (250-300 words total)
- Use professional, confident tone

Resume:
{resume_text}

Job Description:
{job_description}

Return only the properly formatted cover letter:"#;

/// System prompt for the email pass.
pub const EMAIL_SYSTEM: &str = "You are an expert in professional communication. Write ONLY \
    the email content. Do not include ANY analysis, explanations, commentary, word counts, or \
    planning text. Do not mention word limits. Do not use phrases like 'Let's', 'We should', \
    'assistantfinal', or any meta-commentary. Output must start directly with the email content.";

/// Email prompt template. Replace `{tone_instruction}` and `{cover_letter_excerpt}`.
pub const EMAIL_PROMPT_TEMPLATE: &str = r#"{tone_instruction}

IMPORTANT: Return ONLY the email content. Do not include any analysis, explanations, or commentary.

The email should:
- Be concise (under 150 words)
- Include a brief introduction
- Mention that a tailored cover letter is attached
- Have a professional closing
- Start with a subject line if appropriate

Based on this cover letter context:
{cover_letter_excerpt}...

Return only the email content:"#;

/// Number of cover letter characters embedded in the email prompt.
pub const COVER_LETTER_EXCERPT_CHARS: usize = 200;
