//! Disease label formatting and the static disease-information catalog

use crate::models::{Crop, DiseaseInfo, Severity};

/// Display label for a machine class label.
///
/// Known classes map to the names used in the disease catalog; anything
/// else is title-cased with underscores turned into spaces.
pub fn format_disease_label(raw: &str) -> String {
    let known = match raw {
        "bacterial_blight" => "Bacterial Blight",
        "brown_streak_disease" => "Cassava Brown Streak Disease",
        "green_mottle" => "Green Mottle",
        "mosaic_disease" => "Cassava Mosaic Disease",
        "healthy" => "Healthy",
        "blight" | "northern_leaf_blight" => "Corn Leaf Blight",
        "common_rust" => "Common Rust",
        "gray_leaf_spot" => "Gray Leaf Spot",
        "bacterial_spot" => "Bacterial Spot",
        "early_blight" => "Early Blight",
        "late_blight" => "Late Blight",
        "leaf_mold" => "Leaf Mold",
        "mosaic_virus" => "Mosaic Virus",
        "septoria_spot" => "Septoria Leaf Spot",
        "spider_mites" => "Spider Mites",
        "target_spot" => "Target Spot",
        "yellow_leaf_curl_virus" => "Yellow Leaf Curl Virus",
        _ => return title_case(raw),
    };
    known.to_string()
}

/// `snake_case` or spaced text to Title Case
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;

    for c in raw.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphanumeric() {
            if in_word {
                out.push(c);
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Machine class label for a display label, if the crop's model emits it
pub fn machine_label(crop: Crop, display: &str) -> Option<&'static str> {
    crop.classes()
        .iter()
        .copied()
        .find(|class| format_disease_label(class) == display)
}

/// Exact catalog record for a crop and a machine or display label
pub fn lookup_exact(crop: Crop, label: &str) -> Option<&'static DiseaseInfo> {
    let display = format_disease_label(label);

    let info = match (crop, display.as_str()) {
        (Crop::Cassava, "Cassava Mosaic Disease") => &CASSAVA_MOSAIC_DISEASE,
        (Crop::Cassava, "Cassava Brown Streak Disease") => &CASSAVA_BROWN_STREAK_DISEASE,
        (Crop::Cassava, "Green Mottle") => &CASSAVA_GREEN_MOTTLE,
        (Crop::Cassava, "Healthy") => &CASSAVA_HEALTHY,
        (Crop::Maize, "Corn Leaf Blight") => &MAIZE_CORN_LEAF_BLIGHT,
        (Crop::Maize, "Common Rust") => &MAIZE_COMMON_RUST,
        (Crop::Maize, "Gray Leaf Spot") => &MAIZE_GRAY_LEAF_SPOT,
        (Crop::Maize, "Healthy") => &MAIZE_HEALTHY,
        (Crop::Tomato, "Early Blight") => &TOMATO_EARLY_BLIGHT,
        (Crop::Tomato, "Late Blight") => &TOMATO_LATE_BLIGHT,
        (Crop::Tomato, "Bacterial Spot") => &TOMATO_BACTERIAL_SPOT,
        (Crop::Tomato, "Leaf Mold") => &TOMATO_LEAF_MOLD,
        (Crop::Tomato, "Mosaic Virus") => &TOMATO_MOSAIC_VIRUS,
        // Older saved results carry the short label
        (Crop::Tomato, "Septoria Leaf Spot" | "Septoria Spot") => &TOMATO_SEPTORIA_LEAF_SPOT,
        (Crop::Tomato, "Spider Mites") => &TOMATO_SPIDER_MITES,
        (Crop::Tomato, "Target Spot") => &TOMATO_TARGET_SPOT,
        (Crop::Tomato, "Yellow Leaf Curl Virus") => &TOMATO_YELLOW_LEAF_CURL_VIRUS,
        (Crop::Tomato, "Healthy") => &TOMATO_HEALTHY,
        _ => return None,
    };

    Some(info)
}

/// The crop's "Healthy" record
pub fn healthy_info(crop: Crop) -> &'static DiseaseInfo {
    match crop {
        Crop::Cassava => &CASSAVA_HEALTHY,
        Crop::Maize => &MAIZE_HEALTHY,
        Crop::Tomato => &TOMATO_HEALTHY,
    }
}

/// Catalog record for a crop and label, falling back to the crop's
/// "Healthy" record when there is no exact entry
pub fn disease_info(crop: Crop, label: &str) -> &'static DiseaseInfo {
    lookup_exact(crop, label).unwrap_or_else(|| healthy_info(crop))
}

// ============================================================================
// Catalog records
// ============================================================================

const HEALTHY_RECOMMENDATIONS: &[&str] = &[
    "Continue current management practices including proper fertilization, irrigation, and pest control measures",
    "Conduct regular field monitoring at least twice weekly to detect any early signs of disease or pest issues",
    "Maintain optimal soil health through organic matter incorporation and balanced nutrient management programs",
    "Implement preventive pest management strategies including beneficial insect conservation and habitat management",
    "Ensure proper plant spacing and field sanitation to maintain ideal growing conditions",
    "Keep detailed records of field activities, weather conditions, and plant performance for future reference",
];

static CASSAVA_MOSAIC_DISEASE: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Distinctive yellow and green mosaic patterns appearing on leaf surfaces with irregular chlorotic patches",
        "Severe stunting of plant growth with shortened internodes and reduced overall plant height",
        "Significant reduction in tuber yield with smaller, fewer roots and decreased starch content",
        "Leaf distortion and curling with asymmetrical growth patterns and reduced leaf size",
        "Premature leaf drop in severe cases, starting from older leaves and progressing upward",
    ],
    recommendations: &[
        "Immediately remove and destroy all infected plants to prevent virus spread to healthy crops",
        "Source and plant only certified virus-free planting material from reputable agricultural suppliers",
        "Implement integrated pest management to control whitefly vectors using yellow sticky traps and appropriate insecticides",
        "Practice crop rotation with non-host plants for at least 2-3 seasons to break the disease cycle",
        "Maintain proper field sanitation by removing plant debris and weeds that may harbor the virus",
        "Apply foliar fertilizers containing potassium and phosphorus to strengthen plant immunity and resilience",
    ],
    severity: Severity::High,
    affected_area: "Leaves and stems",
};

static CASSAVA_BROWN_STREAK_DISEASE: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Dark brown to black necrotic streaks running longitudinally through the root flesh and cortex",
        "Progressive yellowing of leaves starting from leaf margins and spreading inward with eventual necrosis",
        "Severe root rot with soft, discolored tissues that emit a foul odor when advanced",
        "Stem cankers appearing as sunken, dark lesions that may girdle the stem and cause wilting",
        "Reduced root quality with bitter taste and decreased nutritional value making them unsuitable for consumption",
    ],
    recommendations: &[
        "Plant resistant or tolerant cassava varieties specifically bred for brown streak disease resistance",
        "Implement strict crop rotation with cereals or legumes for at least 3-4 years to reduce soil-borne inoculum",
        "Remove and burn all infected plant materials including roots, stems, and leaves to prevent disease spread",
        "Apply organic soil amendments like compost and well-decomposed manure to improve soil health and drainage",
        "Ensure proper field drainage to prevent waterlogging which exacerbates root rot conditions",
        "Monitor fields regularly and scout for early symptoms to enable prompt intervention measures",
    ],
    severity: Severity::Critical,
    affected_area: "Roots and leaves",
};

static CASSAVA_GREEN_MOTTLE: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Light and dark green mottled patterns on leaf surfaces creating a variegated appearance",
        "Mild to moderate plant stunting with slightly reduced stem elongation and leaf development",
        "Decreased photosynthetic efficiency evidenced by lighter green coloration and reduced vigor",
        "Subtle leaf deformation with slightly irregular leaf shapes and minor vein clearing",
        "Gradual decline in overall plant health with reduced biomass accumulation over time",
    ],
    recommendations: &[
        "Enhance plant nutrition with balanced NPK fertilizers, focusing on nitrogen and magnesium supplementation",
        "Implement regular monitoring schedules with weekly field inspections to track disease progression",
        "Apply foliar nutrients containing microelements like zinc, iron, and manganese to boost chlorophyll production",
        "Control insect pests that may stress plants and make them more susceptible to secondary infections",
        "Ensure adequate spacing between plants to improve air circulation and reduce humidity around foliage",
        "Apply organic mulch around plants to maintain soil moisture and suppress competing weeds",
    ],
    severity: Severity::Medium,
    affected_area: "Leaves",
};

static CASSAVA_HEALTHY: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "No visible disease symptoms with uniform green coloration throughout the plant canopy",
        "Normal vigorous growth with appropriate stem elongation and regular leaf development patterns",
        "Healthy dark green leaves showing optimal chlorophyll content and photosynthetic activity",
        "Strong root system development with normal tuber formation and healthy white flesh",
        "Consistent plant architecture with balanced vegetative growth and normal flowering patterns",
    ],
    recommendations: HEALTHY_RECOMMENDATIONS,
    severity: Severity::None,
    affected_area: "None",
};

static MAIZE_CORN_LEAF_BLIGHT: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Large elongated tan to dark brown lesions developing on leaf surfaces, typically 1-6 inches in length",
        "Distinctive cigar-shaped or elliptical spots with defined margins and grayish-brown centers",
        "Progressive leaf death starting from lower leaves and moving upward through the canopy",
        "Lesions may have yellow halos or water-soaked margins during humid conditions",
        "Severe infections can cause complete leaf blight and premature senescence of entire plants",
    ],
    recommendations: &[
        "Apply systemic fungicides containing active ingredients like azoxystrobin or propiconazole at first sign of infection",
        "Remove and destroy all infected crop debris immediately after harvest to eliminate overwintering inoculum sources",
        "Improve field air circulation by maintaining proper plant spacing and avoiding overcrowding in planting patterns",
        "Implement crop rotation with non-host crops like soybeans or cotton for at least 2-3 years to break disease cycle",
        "Apply balanced fertilization with emphasis on potassium to strengthen plant cell walls and disease resistance",
        "Scout fields regularly during humid weather conditions when disease pressure is typically highest",
    ],
    severity: Severity::High,
    affected_area: "Leaves",
};

static MAIZE_COMMON_RUST: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Small reddish-brown to cinnamon-colored pustules scattered across leaf surfaces, primarily on upper leaf sides",
        "Orange to rust-colored powdery spores readily visible and easily rubbed off infected leaves",
        "Progressive leaf damage with yellowing and browning of tissue surrounding pustule sites",
        "Pustules may coalesce to form larger necrotic areas during severe infections",
        "Premature leaf senescence and reduced photosynthetic capacity in heavily infected plants",
    ],
    recommendations: &[
        "Plant resistant or tolerant maize hybrids that carry genetic resistance to common rust pathogen",
        "Apply protective fungicides containing strobilurin or triazole compounds when weather favors disease development",
        "Monitor fields weekly during warm, humid conditions when rust development is most rapid and severe",
        "Ensure adequate plant nutrition with balanced NPK fertilizers to maintain plant vigor and natural resistance",
        "Remove volunteer corn plants and grass weeds that can serve as alternative hosts for rust spores",
        "Time planting to avoid peak rust spore release periods in your local area based on weather patterns",
    ],
    severity: Severity::Medium,
    affected_area: "Leaves and stems",
};

static MAIZE_GRAY_LEAF_SPOT: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Small gray to brown rectangular or linear lesions aligned parallel to leaf veins",
        "Lesions typically 0.5-2 inches long with distinct straight edges and tan to gray centers",
        "Progressive leaf blight starting from lower leaves and spreading upward through the plant canopy",
        "Lesions may have dark brown borders and can coalesce to form large necrotic areas",
        "Severe infections cause premature leaf death and significant reduction in grain fill",
    ],
    recommendations: &[
        "Select and plant resistant maize hybrids specifically bred for gray leaf spot tolerance in your region",
        "Apply preventive fungicides containing active ingredients like pyraclostrobin or tebuconazole before symptoms appear",
        "Manage crop residue by incorporating or removing corn debris to reduce inoculum sources for next season",
        "Implement minimum tillage practices to bury infected crop residue and reduce spore dispersal from soil surface",
        "Maintain proper plant density and row spacing to ensure adequate air movement and reduce leaf wetness duration",
        "Apply foliar fertilizers containing silicon and calcium to strengthen leaf tissue and improve disease resistance",
    ],
    severity: Severity::High,
    affected_area: "Leaves",
};

static MAIZE_HEALTHY: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "No visible disease symptoms with uniform dark green coloration throughout all leaf surfaces",
        "Normal vigorous growth with appropriate plant height, stem thickness, and leaf development",
        "Healthy green leaves displaying optimal size, shape, and photosynthetic activity",
        "Strong root system with healthy white roots and normal nutrient uptake capacity",
        "Proper ear development with full kernel set and normal grain filling progression",
    ],
    recommendations: HEALTHY_RECOMMENDATIONS,
    severity: Severity::None,
    affected_area: "None",
};

static TOMATO_EARLY_BLIGHT: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Dark brown circular spots with distinctive concentric rings creating a target-like or bulls-eye appearance",
        "Lesions typically start small (1-2mm) and expand to 10-15mm in diameter with defined borders",
        "Progressive yellowing of leaves beginning around lesions and spreading throughout affected leaflets",
        "Lower leaves affected first with disease progression moving upward through the plant canopy",
        "Stem lesions may appear as dark, sunken cankers that can girdle stems and cause wilting",
    ],
    recommendations: &[
        "Remove and destroy infected lower leaves immediately to prevent spore production and disease progression",
        "Apply preventive fungicides containing chlorothalonil or copper compounds every 7-14 days during humid weather",
        "Improve air circulation around plants by proper spacing, pruning, and using support systems like cages or stakes",
        "Apply organic mulch around plants to prevent soil splash and reduce inoculum contact with lower leaves",
        "Ensure adequate plant nutrition with balanced fertilizers, avoiding excessive nitrogen which promotes soft growth",
        "Implement drip irrigation or soaker hoses to keep foliage dry and reduce favorable conditions for fungal development",
    ],
    severity: Severity::Medium,
    affected_area: "Leaves and stems",
};

static TOMATO_LATE_BLIGHT: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Water-soaked lesions appearing as dark, greasy spots on leaves, stems, and fruits",
        "White to grayish fungal growth (sporangia) visible on leaf undersides during humid conditions",
        "Extremely rapid disease spread with entire plants becoming infected within 24-48 hours",
        "Brown to black necrotic areas that quickly expand and cause tissue collapse",
        "Characteristic musty or moldy odor emanating from severely infected plant parts",
    ],
    recommendations: &[
        "Apply systemic fungicides containing metalaxyl or dimethomorph immediately upon first symptom detection",
        "Remove and destroy entire infected plants including roots to prevent rapid disease spread to neighboring plants",
        "Control humidity levels in greenhouse environments using ventilation fans and dehumidification systems",
        "Implement strict sanitation protocols including disinfecting tools, hands, and equipment between plant handling",
        "Monitor weather conditions closely and apply preventive treatments before forecasted cool, wet periods",
        "Source certified disease-free transplants and avoid saving seeds from potentially infected plants",
    ],
    severity: Severity::Critical,
    affected_area: "Leaves, stems, and fruits",
};

static TOMATO_BACTERIAL_SPOT: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Small dark brown to black spots (1-3mm diameter) with irregular margins on leaves and fruits",
        "Bright yellow halos surrounding spots, particularly visible on younger leaves",
        "Progressive leaf drop starting with heavily spotted lower leaves and moving upward",
        "Fruit lesions appear as raised, scab-like spots that may crack and provide entry for secondary pathogens",
        "Severe infections cause defoliation and reduced fruit quality with unmarketable appearance",
    ],
    recommendations: &[
        "Apply copper-based bactericides like copper sulfate or copper hydroxide at weekly intervals during disease-favorable weather",
        "Remove and destroy infected plants and plant debris to reduce bacterial inoculum sources in the field",
        "Avoid overhead irrigation and use drip or furrow irrigation methods to minimize water splash and bacterial dispersal",
        "Implement crop rotation with non-solanaceous crops for at least 3-4 years to break the bacterial disease cycle",
        "Use certified pathogen-free seeds and transplants from reputable sources to prevent introduction of bacterial contamination",
        "Apply preventive treatments with streptomycin or oxytetracycline antibiotics where legally permitted and recommended",
    ],
    severity: Severity::Medium,
    affected_area: "Leaves and fruits",
};

static TOMATO_LEAF_MOLD: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Yellow spots on upper leaf surface",
        "Olive-green mold on underside",
        "Leaf drop",
    ],
    recommendations: &[
        "Improve greenhouse ventilation by installing exhaust fans and opening vents to reduce humidity levels below 85%",
        "Apply fungicides containing chlorothalonil, mancozeb, or copper compounds at first sign of infection",
        "Control relative humidity through proper plant spacing, pruning, and avoiding overhead watering systems",
        "Remove lower leaves and suckers to improve air circulation and reduce humidity around the plant canopy",
        "Monitor temperature and humidity levels using digital sensors and maintain optimal growing conditions",
        "Apply foliar applications of potassium bicarbonate or baking soda solutions as organic fungicide alternatives",
    ],
    severity: Severity::Medium,
    affected_area: "Leaves",
};

static TOMATO_MOSAIC_VIRUS: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Distinctive mottled patterns of light and dark green areas creating a mosaic appearance on leaf surfaces",
        "Significant plant stunting with reduced stem elongation and overall diminished plant size",
        "Severe leaf distortion including curling, puckering, and asymmetrical growth patterns",
        "Reduced fruit production with smaller, misshapen tomatoes and poor fruit quality",
        "Yellowing and necrosis of leaf tissue in severe cases, particularly in older leaves",
    ],
    recommendations: &[
        "Remove and destroy infected plants immediately including root systems to prevent virus reservoir establishment",
        "Control aphid vectors using integrated pest management including beneficial insects, reflective mulches, and targeted insecticides",
        "Use certified virus-free seeds and transplants from reputable suppliers with pathogen testing programs",
        "Implement strict sanitation protocols including tool disinfection with 10% bleach solution between plants",
        "Apply reflective aluminum mulch around plants to deter aphid landing and reduce virus transmission rates",
        "Monitor surrounding weeds and volunteer plants that may serve as virus reservoirs and remove them promptly",
    ],
    severity: Severity::High,
    affected_area: "Entire plant",
};

static TOMATO_SEPTORIA_LEAF_SPOT: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Small dark spots with gray centers",
        "Yellow halos",
        "Leaf drop",
    ],
    recommendations: &[
        "Remove infected lower leaves and destroy them to reduce spore production and prevent disease progression",
        "Apply protective fungicides containing chlorothalonil, mancozeb, or copper compounds every 10-14 days",
        "Improve air circulation through proper plant spacing, staking, and removal of unnecessary foliage",
        "Use drip irrigation or soaker hoses to keep foliage dry and reduce conditions favorable for spore germination",
        "Apply organic mulch around plants to prevent soil splash and reduce contact between soil-borne spores and leaves",
        "Rotate crops with non-solanaceous plants for 3-4 years to break the disease cycle and reduce soil inoculum",
    ],
    severity: Severity::Medium,
    affected_area: "Leaves",
};

static TOMATO_SPIDER_MITES: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Fine silken webbing visible on leaf undersides and between leaves, especially during dry conditions",
        "Yellow stippling or speckling on leaf surfaces caused by mite feeding punctures",
        "Progressive leaf drop starting with lower leaves and advancing upward through the plant",
        "Leaves may appear bronze or rust-colored in severe infestations due to extensive feeding damage",
        "Tiny moving dots (mites) visible with hand lens, particularly on leaf undersides near veins",
    ],
    recommendations: &[
        "Apply miticides containing abamectin, bifenazate, or spiromesifen, rotating active ingredients to prevent resistance",
        "Increase relative humidity around plants through misting systems or placing water trays to discourage mite reproduction",
        "Remove heavily infested plants and destroy them to prevent mite population spread to healthy plants",
        "Release beneficial predatory mites like Phytoseiulus persimilis as biological control agents in greenhouse settings",
        "Apply insecticidal soap or neem oil sprays every 3-5 days, ensuring thorough coverage of leaf undersides",
        "Monitor plants regularly using hand lens to detect early infestations before populations become established",
    ],
    severity: Severity::Medium,
    affected_area: "Leaves and stems",
};

static TOMATO_TARGET_SPOT: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Dark brown spots with rings",
        "Yellow halos",
        "Leaf drop",
    ],
    recommendations: &[
        "Remove infected leaves and plant debris immediately to reduce inoculum sources and prevent spore dispersal",
        "Apply fungicides containing azoxystrobin, pyraclostrobin, or chlorothalonil at first symptom appearance",
        "Improve air circulation through proper plant spacing, pruning, and use of support structures like stakes or cages",
        "Implement crop rotation with non-solanaceous crops for at least 3 years to break the fungal disease cycle",
        "Use drip irrigation systems to minimize leaf wetness and reduce conditions favorable for fungal development",
        "Apply preventive treatments during periods of high humidity and warm temperatures when disease pressure increases",
    ],
    severity: Severity::Medium,
    affected_area: "Leaves and fruits",
};

static TOMATO_YELLOW_LEAF_CURL_VIRUS: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "Yellowing and curling leaves",
        "Stunted growth",
        "Reduced yield",
    ],
    recommendations: &[
        "Remove and destroy infected plants including root systems to eliminate virus sources and prevent spread",
        "Control whitefly vectors using yellow sticky traps, reflective mulches, and systemic insecticides like imidacloprid",
        "Plant resistant or tolerant tomato varieties that carry genetic resistance to yellow leaf curl virus",
        "Install fine mesh screens in greenhouse openings to prevent whitefly entry and virus introduction",
        "Apply reflective aluminum mulch around plants to deter whitefly landing and reduce virus transmission",
        "Monitor surrounding areas for infected weeds and volunteer plants that serve as virus reservoirs",
    ],
    severity: Severity::High,
    affected_area: "Leaves and stems",
};

static TOMATO_HEALTHY: DiseaseInfo = DiseaseInfo {
    symptoms: &[
        "No visible disease symptoms with vibrant dark green foliage and uniform plant coloration",
        "Normal vigorous growth with appropriate plant height, stem development, and leaf expansion",
        "Healthy green leaves showing optimal size, proper shape, and strong photosynthetic activity",
        "Strong root system with healthy white roots and efficient nutrient and water uptake",
        "Proper flower and fruit development with normal fruit set, size, and quality characteristics",
    ],
    recommendations: HEALTHY_RECOMMENDATIONS,
    severity: Severity::None,
    affected_area: "None",
};
