/// Header line that opens the color section of a model response.
pub const COLOR_SECTION_MARKER: &str = "[Color Analysis]";

const STYLE_AND_COLOR_PROMPT: &str = r#"Analyze the interior design style and colors of the room shown in the image.

Respond in this exact format:

[Style Title]
[One or two short sentences (max 30 words) that describe the overall mood and aesthetic of the space.]

[Color Analysis]
List 5-7 dominant colors in this format:
- #HEXCODE: Color Name
- #HEXCODE: Color Name
etc.

Guidelines:

Style Analysis:
Use a clear, specific style title (2–4 words) such as "Scandinavian Minimalism" or "Industrial Chic".
Focus on the overall design style, not a list of furniture.
Use editorial language (e.g., calm, refined, natural, bold).
Avoid repeating "This room features..." or overly technical phrasing.
Do not exceed 30 words in the description.

Color Analysis:
- Identify the most prominent colors in the space
- Include both wall colors and major furniture/decoration colors
- Use standard color names (e.g., "Sage Green" instead of "Muted Forest")
- Ensure hex codes are valid and match the described colors
- Order colors from most dominant to least dominant
- Always use the exact format: - #HEXCODE: Color Name

Examples:

Modern Minimalism
Clean lines and neutral tones create a calm, uncluttered space with a sleek and elegant feel.

[Color Analysis]
- #F5F5F5: Pure White
- #E0E0E0: Light Gray
- #2C3E50: Deep Blue Gray
- #D4AF37: Antique Gold
- #8B4513: Saddle Brown

Bohemian Eclectic
Layered textures and colorful decor give this room a warm, creative, and relaxed atmosphere.

[Color Analysis]
- #E67E22: Burnt Orange
- #2ECC71: Emerald Green
- #F1C40F: Sunflower Yellow
- #8E44AD: Deep Purple
- #E74C3C: Coral Red"#;

const STYLE_ONLY_PROMPT: &str = r#"Analyze the interior design style of the room shown in the image.

Respond in this exact format:

[Style Title]
[One or two short sentences (max 30 words) that describe the overall mood and aesthetic of the space.]

Guidelines:
Use a clear, specific style title (2–4 words) such as "Scandinavian Minimalism" or "Industrial Chic".
Focus on the overall design style, not a list of furniture.
Use editorial language (e.g., calm, refined, natural, bold).
Avoid repeating "This room features..." or overly technical phrasing.
Do not exceed 30 words in the description.
Write the title on the first line and the description on the second line, with nothing else.

Examples:

Modern Minimalism
Clean lines and neutral tones create a calm, uncluttered space with a sleek and elegant feel.

Bohemian Eclectic
Layered textures and colorful decor give this room a warm, creative, and relaxed atmosphere."#;

/// Selects the instruction text sent alongside the image.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    include_color_analysis: bool,
}

impl PromptBuilder {
    pub fn new(include_color_analysis: bool) -> Self {
        Self {
            include_color_analysis,
        }
    }

    pub fn includes_color_analysis(&self) -> bool {
        self.include_color_analysis
    }

    pub fn build(&self) -> &'static str {
        if self.include_color_analysis {
            STYLE_AND_COLOR_PROMPT
        } else {
            STYLE_ONLY_PROMPT
        }
    }
}
