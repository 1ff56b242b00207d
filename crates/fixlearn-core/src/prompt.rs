//! Prompt construction.
//!
//! The reply contract is two delimited sections, a fenced code block under
//! `### FIXED CODE` and a bullet list under `### CONCEPTS`, which
//! [`crate::parse`] knows how to read back.

/// Header the model is told to put above the corrected code.
pub const CODE_HEADER: &str = "### FIXED CODE";
/// Header the model is told to put above the concept list.
pub const CONCEPTS_HEADER: &str = "### CONCEPTS";

const INSTRUCTIONS: &str = "\
You are a patient programming tutor. Identify the programming language of the \
code below, fix it so the error no longer occurs, and name the programming \
concepts a learner needs in order to understand the fix.";

const LIMITS: &str = "\
List between one and five concepts, most important first. Do not add
explanations outside these two sections.";

/// Build the prompt for `code` failing with `error`.
///
/// Both inputs are embedded verbatim between explicit begin/end markers.
pub fn build_prompt(code: &str, error: &str) -> String {
  format!(
    "{INSTRUCTIONS}\n\n\
     --- BEGIN CODE ---\n{code}\n--- END CODE ---\n\n\
     --- BEGIN ERROR ---\n{error}\n--- END ERROR ---\n\n\
     Reply using exactly this format and nothing else:\n\n\
     {CODE_HEADER}\n\
     ```<language>\n\
     <the complete corrected code>\n\
     ```\n\n\
     {CONCEPTS_HEADER}\n\
     - <short concept name, e.g. Variable Initialization>\n\
     - <another concept, e.g. Error Handling: NameError>\n\n\
     {LIMITS}\n"
  )
}
