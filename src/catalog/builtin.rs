//! Built-in trigger table.

use std::collections::BTreeSet;

use crate::condition::GutCondition::{self, Additives, Allergies, Gluten, Histamine, IbsFodmap, Lactose, Reflux};
use crate::condition::SeverityLevel::{self, Mild, Moderate, Severe};

use super::{HiddenTrigger, TriggerCategory, TriggerOrigin};

struct Row {
    name: &'static str,
    aliases: &'static [&'static str],
    e_number: Option<&'static str>,
    category: TriggerCategory,
    conditions: &'static [GutCondition],
    severity: SeverityLevel,
    description: &'static str,
    sources: &'static [&'static str],
    alternatives: &'static [&'static str],
    keywords: &'static [&'static str],
}

const ROWS: &[Row] = &[
    Row {
        name: "Aspartame",
        aliases: &["nutrasweet", "aminosweet", "canderel"],
        e_number: Some("E951"),
        category: TriggerCategory::Sweetener,
        conditions: &[IbsFodmap, Additives],
        severity: Moderate,
        description: "Artificial sweetener linked to bloating and altered gut flora",
        sources: &["diet soda", "sugar-free gum", "light yogurt", "tabletop sweeteners"],
        alternatives: &["stevia", "maple syrup", "small amounts of table sugar"],
        keywords: &["phenylalanine"],
    },
    Row {
        name: "Sucralose",
        aliases: &["splenda"],
        e_number: Some("E955"),
        category: TriggerCategory::Sweetener,
        conditions: &[IbsFodmap, Additives],
        severity: Moderate,
        description: "Chlorinated artificial sweetener that may disturb gut bacteria",
        sources: &["protein bars", "diet drinks", "sugar-free syrups"],
        alternatives: &["stevia", "maple syrup"],
        keywords: &[],
    },
    Row {
        name: "Sorbitol",
        aliases: &["glucitol"],
        e_number: Some("E420"),
        category: TriggerCategory::Sweetener,
        conditions: &[IbsFodmap],
        severity: Severe,
        description: "Polyol sugar alcohol; poorly absorbed and strongly fermentable",
        sources: &["sugar-free candy", "chewing gum", "diabetic chocolate", "stone fruit"],
        alternatives: &["stevia", "glucose syrup", "small amounts of table sugar"],
        keywords: &["polyol"],
    },
    Row {
        name: "Mannitol",
        aliases: &["manna sugar"],
        e_number: Some("E421"),
        category: TriggerCategory::Sweetener,
        conditions: &[IbsFodmap],
        severity: Severe,
        description: "Polyol sugar alcohol with a strong laxative effect",
        sources: &["sugar-free mints", "chewing gum", "mushrooms"],
        alternatives: &["stevia", "glucose syrup"],
        keywords: &[],
    },
    Row {
        name: "Xylitol",
        aliases: &["birch sugar"],
        e_number: Some("E967"),
        category: TriggerCategory::Sweetener,
        conditions: &[IbsFodmap],
        severity: Severe,
        description: "Polyol sugar alcohol common in dental products",
        sources: &["chewing gum", "toothpaste", "sugar-free baking mixes"],
        alternatives: &["stevia", "maple syrup"],
        keywords: &[],
    },
    Row {
        name: "Maltitol",
        aliases: &["maltitol syrup", "hydrogenated maltose", "lesys"],
        e_number: Some("E965"),
        category: TriggerCategory::Sweetener,
        conditions: &[IbsFodmap],
        severity: Severe,
        description: "Polyol used in no-sugar-added chocolate; causes gas and diarrhea",
        sources: &["sugar-free chocolate", "low-carb bars", "diet ice cream"],
        alternatives: &["dark chocolate with sugar", "stevia"],
        keywords: &[],
    },
    Row {
        name: "Isomalt",
        aliases: &["hydrogenated isomaltulose"],
        e_number: Some("E953"),
        category: TriggerCategory::Sweetener,
        conditions: &[IbsFodmap],
        severity: Moderate,
        description: "Polyol blend used in hard candy",
        sources: &["hard candy", "cough drops", "cake decorations"],
        alternatives: &["regular hard candy", "glucose syrup"],
        keywords: &[],
    },
    Row {
        name: "Erythritol",
        aliases: &[],
        e_number: Some("E968"),
        category: TriggerCategory::Sweetener,
        conditions: &[IbsFodmap],
        severity: Mild,
        description: "Polyol that is mostly absorbed; problematic only in larger amounts",
        sources: &["keto snacks", "sweetener blends"],
        alternatives: &["stevia"],
        keywords: &[],
    },
    Row {
        name: "High Fructose Corn Syrup",
        aliases: &["hfcs", "glucose-fructose syrup", "fructose-glucose syrup", "isoglucose"],
        e_number: None,
        category: TriggerCategory::Sweetener,
        conditions: &[IbsFodmap],
        severity: Moderate,
        description: "Excess free fructose that can overwhelm absorption",
        sources: &["soft drinks", "sauces", "breakfast cereals", "baked goods"],
        alternatives: &["cane sugar", "rice malt syrup"],
        keywords: &["fructose syrup", "crystalline fructose"],
    },
    Row {
        name: "Inulin",
        aliases: &[
            "chicory root fiber",
            "chicory root extract",
            "chicory fibre",
            "oligofructose",
            "fructooligosaccharides",
            "fos",
        ],
        e_number: None,
        category: TriggerCategory::Additive,
        conditions: &[IbsFodmap],
        severity: Severe,
        description: "Fructan fiber added for 'prebiotic' claims; highly fermentable",
        sources: &["high-fiber bars", "protein powders", "gluten-free bread", "yogurt"],
        alternatives: &["psyllium", "oat fiber"],
        keywords: &["chicory"],
    },
    Row {
        name: "Carrageenan",
        aliases: &["irish moss", "processed eucheuma seaweed"],
        e_number: Some("E407"),
        category: TriggerCategory::Stabilizer,
        conditions: &[IbsFodmap, Additives],
        severity: Moderate,
        description: "Seaweed-derived thickener associated with gut inflammation",
        sources: &["plant milks", "ice cream", "deli meats", "cream cheese"],
        alternatives: &["products thickened with gellan gum", "guar-free plant milks"],
        keywords: &[],
    },
    Row {
        name: "Polysorbate 80",
        aliases: &["tween 80", "polyoxyethylene sorbitan monooleate"],
        e_number: Some("E433"),
        category: TriggerCategory::Emulsifier,
        conditions: &[IbsFodmap, Additives],
        severity: Moderate,
        description: "Synthetic emulsifier that may thin the protective mucus layer",
        sources: &["ice cream", "salad dressings", "vitamin gummies"],
        alternatives: &["products emulsified with sunflower lecithin"],
        keywords: &["polysorbate"],
    },
    Row {
        name: "Carboxymethylcellulose",
        aliases: &["cellulose gum", "cmc", "sodium carboxymethylcellulose"],
        e_number: Some("E466"),
        category: TriggerCategory::Stabilizer,
        conditions: &[IbsFodmap, Additives],
        severity: Moderate,
        description: "Synthetic thickener linked to changes in gut bacteria",
        sources: &["ice cream", "gluten-free bakery", "sauces"],
        alternatives: &["products without added gums"],
        keywords: &[],
    },
    Row {
        name: "Sodium Benzoate",
        aliases: &["benzoate of soda", "benzoic acid"],
        e_number: Some("E211"),
        category: TriggerCategory::Preservative,
        conditions: &[Additives, Histamine],
        severity: Moderate,
        description: "Preservative that can act as a histamine liberator",
        sources: &["soft drinks", "pickles", "sauces", "fruit juice"],
        alternatives: &["refrigerated fresh products", "preservative-free sauces"],
        keywords: &["benzoate"],
    },
    Row {
        name: "Potassium Sorbate",
        aliases: &["sorbic acid"],
        e_number: Some("E202"),
        category: TriggerCategory::Preservative,
        conditions: &[Additives],
        severity: Mild,
        description: "Common mold inhibitor; occasionally irritating in sensitive users",
        sources: &["cheese", "baked goods", "dried fruit", "wine"],
        alternatives: &["freshly baked goods"],
        keywords: &[],
    },
    Row {
        name: "Sulfites",
        aliases: &[
            "sodium metabisulfite",
            "potassium metabisulfite",
            "sodium bisulfite",
            "sulfur dioxide",
            "sulphur dioxide",
            "e220",
            "e221",
            "e222",
            "e223",
            "e224",
        ],
        e_number: Some("E220"),
        category: TriggerCategory::Preservative,
        conditions: &[Histamine, Allergies, Additives],
        severity: Severe,
        description: "Preservatives that can provoke asthma-like and histamine reactions",
        sources: &["wine", "dried fruit", "pickled foods", "shrimp"],
        alternatives: &["sulfite-free dried fruit", "fresh produce"],
        keywords: &["sulfite", "sulphite", "metabisulfite", "metabisulphite"],
    },
    Row {
        name: "Sodium Nitrite",
        aliases: &["sodium nitrate", "potassium nitrate", "curing salt"],
        e_number: Some("E250"),
        category: TriggerCategory::Preservative,
        conditions: &[Additives, Histamine],
        severity: Moderate,
        description: "Curing agent in processed meats",
        sources: &["bacon", "ham", "hot dogs", "salami"],
        alternatives: &["uncured fresh meat"],
        keywords: &["nitrite", "nitrate"],
    },
    Row {
        name: "Monosodium Glutamate",
        aliases: &["msg", "glutamic acid", "hydrolyzed vegetable protein", "hydrolysed vegetable protein"],
        e_number: Some("E621"),
        category: TriggerCategory::Flavor,
        conditions: &[Additives, Histamine],
        severity: Moderate,
        description: "Flavor enhancer; some people report headaches and flushing",
        sources: &["instant noodles", "chips", "stock cubes", "takeaway food"],
        alternatives: &["herbs", "homemade stock"],
        keywords: &["glutamate"],
    },
    Row {
        name: "Yeast Extract",
        aliases: &["autolyzed yeast", "autolysed yeast", "hydrolyzed yeast"],
        e_number: None,
        category: TriggerCategory::Flavor,
        conditions: &[Histamine, Additives],
        severity: Moderate,
        description: "Concentrated free glutamates and amines",
        sources: &["stock cubes", "savory snacks", "spreads"],
        alternatives: &["fresh herbs"],
        keywords: &[],
    },
    Row {
        name: "Tartrazine",
        aliases: &["yellow 5", "fd c yellow no 5", "yellow no 5"],
        e_number: Some("E102"),
        category: TriggerCategory::Color,
        conditions: &[Additives, Allergies],
        severity: Moderate,
        description: "Azo dye associated with hives and intolerance reactions",
        sources: &["candy", "soft drinks", "flavored chips"],
        alternatives: &["products colored with turmeric or beta-carotene"],
        keywords: &[],
    },
    Row {
        name: "Allura Red",
        aliases: &["red 40", "fd c red no 40", "red no 40", "allura red ac"],
        e_number: Some("E129"),
        category: TriggerCategory::Color,
        conditions: &[Additives],
        severity: Moderate,
        description: "Azo dye linked to gut inflammation in animal studies",
        sources: &["candy", "sports drinks", "cereal"],
        alternatives: &["products colored with beetroot"],
        keywords: &[],
    },
    Row {
        name: "Lactose",
        aliases: &["milk sugar", "whey", "whey powder", "milk solids", "milk powder", "skimmed milk powder"],
        e_number: None,
        category: TriggerCategory::Other,
        conditions: &[Lactose],
        severity: Severe,
        description: "Milk sugar hidden in processed foods and medicines",
        sources: &["bread", "processed meats", "salad dressings", "tablets"],
        alternatives: &["lactose-free milk", "oat milk", "hard aged cheese"],
        keywords: &["buttermilk", "curds", "dairy solids"],
    },
    Row {
        name: "Casein",
        aliases: &["caseinate", "sodium caseinate", "calcium caseinate", "milk protein"],
        e_number: None,
        category: TriggerCategory::Other,
        conditions: &[Lactose, Allergies],
        severity: Moderate,
        description: "Milk protein used in 'non-dairy' creamers and processed foods",
        sources: &["coffee creamer", "protein bars", "processed cheese"],
        alternatives: &["pea protein", "coconut creamer"],
        keywords: &[],
    },
    Row {
        name: "Wheat",
        aliases: &["spelt", "semolina", "durum", "farro", "kamut", "einkorn", "triticale", "seitan"],
        e_number: None,
        category: TriggerCategory::Other,
        conditions: &[Gluten, IbsFodmap],
        severity: Severe,
        description: "Gluten-containing grain; also a fructan source",
        sources: &["bread", "pasta", "sauces", "breaded foods"],
        alternatives: &["rice", "quinoa", "certified gluten-free oats", "millet"],
        keywords: &["wheat starch", "wheat protein"],
    },
    Row {
        name: "Barley Malt",
        aliases: &["malt extract", "malt syrup", "malt vinegar", "malt flavoring", "barley"],
        e_number: None,
        category: TriggerCategory::Flavor,
        conditions: &[Gluten],
        severity: Severe,
        description: "Barley-derived sweetener and flavoring that contains gluten",
        sources: &["cereal", "beer", "chocolate", "crisps"],
        alternatives: &["rice syrup", "cider vinegar"],
        keywords: &["malted"],
    },
    Row {
        name: "Rye",
        aliases: &["rye flour", "pumpernickel"],
        e_number: None,
        category: TriggerCategory::Other,
        conditions: &[Gluten, IbsFodmap],
        severity: Severe,
        description: "Gluten-containing grain high in fructans",
        sources: &["rye bread", "crispbread", "whiskey"],
        alternatives: &["sorghum", "millet"],
        keywords: &[],
    },
    Row {
        name: "Onion",
        aliases: &["onion powder", "dehydrated onion", "onion extract", "shallot"],
        e_number: None,
        category: TriggerCategory::Other,
        conditions: &[IbsFodmap, Reflux],
        severity: Moderate,
        description: "Major fructan source often hidden in spice blends",
        sources: &["stock", "sauces", "seasoning mixes", "crisps"],
        alternatives: &["green onion tops", "chives", "asafoetida"],
        keywords: &[],
    },
    Row {
        name: "Garlic",
        aliases: &["garlic powder", "garlic salt", "garlic extract", "dehydrated garlic"],
        e_number: None,
        category: TriggerCategory::Other,
        conditions: &[IbsFodmap, Reflux],
        severity: Moderate,
        description: "Fructan source that is rarely declared separately from spices",
        sources: &["sauces", "marinades", "bread", "seasoning mixes"],
        alternatives: &["garlic-infused oil", "chives"],
        keywords: &[],
    },
    Row {
        name: "Caffeine",
        aliases: &["guarana", "kola nut", "coffee extract", "green tea extract"],
        e_number: None,
        category: TriggerCategory::Additive,
        conditions: &[Reflux, IbsFodmap],
        severity: Moderate,
        description: "Relaxes the lower esophageal sphincter and speeds gut transit",
        sources: &["energy drinks", "cola", "chocolate", "pre-workout powders"],
        alternatives: &["decaffeinated options", "herbal tea"],
        keywords: &["caffeinated"],
    },
    Row {
        name: "Capsaicin",
        aliases: &["chili extract", "chilli extract", "cayenne", "oleoresin capsicum"],
        e_number: None,
        category: TriggerCategory::Flavor,
        conditions: &[Reflux, IbsFodmap],
        severity: Moderate,
        description: "Pungent chili compound that irritates the upper gut",
        sources: &["hot sauce", "spicy snacks", "curry pastes"],
        alternatives: &["mild herbs", "black pepper in small amounts"],
        keywords: &["chili", "chilli", "jalapeno"],
    },
    Row {
        name: "Peppermint Oil",
        aliases: &["mint oil", "menthol"],
        e_number: None,
        category: TriggerCategory::Flavor,
        conditions: &[Reflux],
        severity: Mild,
        description: "Relaxes the lower esophageal sphincter",
        sources: &["mints", "chewing gum", "herbal tea"],
        alternatives: &["ginger", "fennel tea"],
        keywords: &["peppermint"],
    },
    Row {
        name: "Vinegar",
        aliases: &["wine vinegar", "balsamic vinegar", "spirit vinegar"],
        e_number: Some("E260"),
        category: TriggerCategory::Other,
        conditions: &[Histamine, Reflux],
        severity: Mild,
        description: "Fermented acid high in histamine",
        sources: &["pickles", "dressings", "ketchup", "mustard"],
        alternatives: &["lemon juice", "fresh herbs"],
        keywords: &["acetic acid"],
    },
    Row {
        name: "Soy Lecithin",
        aliases: &["soya lecithin", "soybean lecithin"],
        e_number: Some("E322"),
        category: TriggerCategory::Emulsifier,
        conditions: &[Allergies],
        severity: Mild,
        description: "Soy-derived emulsifier that can carry soy protein traces",
        sources: &["chocolate", "margarine", "baked goods"],
        alternatives: &["sunflower lecithin"],
        keywords: &[],
    },
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

pub(super) fn entries() -> Vec<HiddenTrigger> {
    ROWS
        .iter()
        .map(|s| HiddenTrigger {
            name: s.name.to_string(),
            aliases: s.aliases.iter().map(|a| (*a).to_string()).collect::<BTreeSet<_>>(),
            e_number: s.e_number.map(str::to_string),
            category: s.category,
            problematic_conditions: s.conditions.iter().copied().collect(),
            severity: s.severity,
            description: s.description.to_string(),
            common_sources: owned(s.sources),
            safe_alternatives: owned(s.alternatives),
            detection_keywords: owned(s.keywords),
            origin: TriggerOrigin::Catalog,
        })
        .collect()
}
