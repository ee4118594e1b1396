/// Fixed instruction sent with every fish photo.
///
/// The five numbered categories line up with the numbered section headers the
/// formatter expects back.
pub const FISH_PROMPT: &str = "Analyze this fish image for educational purposes and provide the following information:\n\
1. Fish identification (name, scientific classification, appearance, size, distinguishing features)\n\
2. Habitat and distribution (natural habitat, geographic range, depth range, water temperature)\n\
3. Biology and behavior (lifespan, diet, reproduction, social structure, interesting behaviors)\n\
4. Conservation status and aquarium care (if applicable)\n\
5. Additional information (cultural significance, similar species, interesting facts)\n\
\n\
IMPORTANT: This is for educational purposes only.";
