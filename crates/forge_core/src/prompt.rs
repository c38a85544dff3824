use crate::Stack;

const PERSONA: &str = "You are an experienced programmer with expertise in web development and \
UI/UX design. You create modern, animated, and fully responsive UI components. You are highly \
skilled in HTML, CSS, Tailwind CSS, Bootstrap, JavaScript, React, Next.js, Vue.js, Angular, and more.";

const REQUIREMENTS: [&str; 8] = [
    "The code must be clean, well-structured, and easy to understand.",
    "Optimize for SEO where applicable.",
    "Focus on creating a modern, animated, and responsive UI design.",
    "Include high-quality hover effects, shadows, animations, colors, and typography.",
    "Make the component accessible: semantic elements, labels, and keyboard focus states.",
    "Return ONLY the code, formatted properly in a single Markdown fenced code block.",
    "Do NOT include explanations, text, comments, or anything else besides the code.",
    "Give the whole code in a single self-contained HTML file.",
];

/// Renders the instruction sent to the text-generation service.
///
/// The description is embedded verbatim; callers reject blank descriptions
/// before getting here. The output depends only on the two inputs.
pub fn build_instruction(description: &str, stack: Stack) -> String {
    let mut out = String::with_capacity(PERSONA.len() + description.len() + 640);
    out.push_str(PERSONA);
    out.push_str("\n\nNow, generate a UI component for: ");
    out.push_str(description);
    out.push_str("\nFramework to use: ");
    out.push_str(stack.value());
    out.push_str("\n\nRequirements:\n");
    for line in REQUIREMENTS {
        out.push_str("- ");
        out.push_str(line);
        out.push('\n');
    }
    out
}
