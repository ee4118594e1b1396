/// Sample analysis shown with the bundled clownfish photo before any upload.
pub const EXAMPLE_ANALYSIS: &str = "1. Fish Identification:
- Name: Clownfish (Amphiprioninae)
- Scientific Classification: Family Pomacentridae (damselfish)
- Appearance: Bright orange with white vertical stripes and black outlines
- Size: 3-4 inches (7-10 cm) in length
- Distinguishing Features: Three white bars on body, black outlines on fins

2. Habitat & Distribution:
- Natural Habitat: Coral reefs in warm waters
- Geographic Range: Indo-Pacific region, Red Sea to Western Pacific
- Depth Range: Typically 3-50 feet (1-15 meters)
- Water Temperature: 75-82°F (24-28°C)
- Association: Lives symbiotically with sea anemones

3. Biology & Behavior:
- Lifespan: 6-10 years in the wild
- Diet: Omnivorous (algae, zooplankton, small invertebrates)
- Reproduction: Sequential hermaphrodites (males can become females)
- Social Structure: Lives in small groups with dominant breeding pair
- Interesting Behavior: Immune to anemone stings due to protective mucus

4. Conservation & Aquarium Care:
- Conservation Status: Not endangered, but habitat threatened by coral bleaching
- Aquarium Suitability: Popular for home aquariums, relatively hardy
- Tank Requirements: Minimum 20 gallons, reef setup with anemone preferred
- Diet in Captivity: Commercial fish food, frozen foods, occasional algae
- Special Needs: Requires stable water parameters, benefits from anemone host

5. Additional Information:
- Cultural Significance: Popularized by the film \"Finding Nemo\"
- Similar Species: Other anemonefish species (30+ species in the genus)
- Interesting Facts: Can change sex from male to female when dominant female dies
- Commercial Importance: Significant value in ornamental fish trade
- Ecological Role: Helps keep anemones clean and protects them from predators";
