//! Prompt templates for the tool-using and coding strategies.

use agent_stack_tools::SearchHit;

/// Most search results embedded in a research prompt
pub const MAX_RESEARCH_RESULTS: usize = 5;

/// `"Search results:\n1. {title}: {snippet}\n..."`
pub fn search_context(hits: &[SearchHit]) -> String {
    let mut context = String::from("Search results:\n");
    for (i, hit) in hits.iter().enumerate() {
        context.push_str(&format!("{}. {}\n", i + 1, hit.summary()));
    }
    context
}

pub fn research_prompt(search_context: &str, input: &str) -> String {
    format!(
        "You are a research assistant. Use the following search results to answer the user's question.\n\n\
         {search_context}\n\n\
         User's question: {input}\n\n\
         Provide a comprehensive answer based on the search results. If the search results don't contain enough information, say so and provide the best answer you can."
    )
}

pub fn coding_prompt(input: &str) -> String {
    format!(
        "You are a coding assistant. The user is asking for help with code. \n\n\
         User's request: {input}\n\n\
         Provide a detailed response with code examples where appropriate. Make sure your code is correct, efficient, and follows best practices."
    )
}

/// Empty when no tool produced output.
pub fn tool_context(outputs: &[String]) -> String {
    if outputs.is_empty() {
        String::new()
    } else {
        format!("Tool results:\n{}\n\n", outputs.join("\n"))
    }
}

pub fn generic_prompt(tool_context: &str, input: &str) -> String {
    format!(
        "{tool_context}User's request: {input}\n\n\
         Provide a helpful response based on the available information."
    )
}
