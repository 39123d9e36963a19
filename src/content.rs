//! Built-in deck: "Rickets in the Dog".
//!
//! Veterinary continuing-education material. This is data, not logic: edit the
//! table, not the builder.

use crate::asset::AssetRef;
use crate::model::{DeckMetadata, DeckSpec, Layout, SlideSpec, Theme, TitleSlideSpec};
use crate::units::{inches, RgbColor};

/// File the built-in deck is saved to.
pub const OUTPUT_FILE: &str = "Rickets_in_the_Dog.pptx";

/// Key of the lateral radiograph.
pub const RICKETS_LATERAL: &str = "rickets_lateral";

/// Key of the antero-posterior radiograph.
pub const RICKETS_AP: &str = "rickets_ap";

/// Dark blue used for every slide background.
pub const DARK_BLUE: RgbColor = RgbColor::new(0, 51, 102);

/// Radiology images (Wikimedia Commons, public domain).
pub fn assets() -> Vec<AssetRef> {
    vec![
        AssetRef::new(
            RICKETS_LATERAL,
            "https://upload.wikimedia.org/wikipedia/commons/3/3e/Rickets_lateral.jpg",
            "rickets_lateral.jpg",
        ),
        AssetRef::new(
            RICKETS_AP,
            "https://upload.wikimedia.org/wikipedia/commons/2/2b/Rickets_AP.jpg",
            "rickets_ap.jpg",
        ),
    ]
}

/// The complete deck definition.
pub fn rickets_in_the_dog() -> DeckSpec {
    DeckSpec {
        metadata: DeckMetadata {
            title: Some("Rickets in the Dog".to_string()),
            author: None,
            subject: Some("Veterinary Continuing Education".to_string()),
        },
        width: inches(13.33),
        height: inches(7.5),
        theme: Theme {
            background: DARK_BLUE,
            ..Theme::default()
        },
        layout: Layout::default(),
        assets: assets(),
        title_slide: TitleSlideSpec {
            title: "Rickets in the Dog".to_string(),
            subtitle: vec![
                "Etiology – Clinical Signs – Diagnosis – Treatment – Management".to_string(),
                "Veterinary Continuing Education".to_string(),
            ],
            title_color: RgbColor::WHITE,
            subtitle_color: RgbColor::new(221, 221, 221),
        },
        slides: slides(),
    }
}

fn slides() -> Vec<SlideSpec> {
    vec![
        SlideSpec::new("Learning Objectives")
            .with_bullets([
                "Define rickets and explain the underlying pathophysiology",
                "List the principal causes in puppies",
                "Recognise clinical & radiological signs",
                "Formulate a diagnostic plan",
                "Outline evidence-based treatment and long-term management",
            ])
            .with_notes(
                "Emphasise that rickets ONLY occurs in growing animals – the growth plate is the target.",
            ),
        SlideSpec::new("What is Rickets?")
            .with_bullets([
                "Metabolic bone disease of young, growing dogs",
                "Failure of mineralisation at the zone of provisional calcification → widened, irregular physes",
                "Consequence of deficient Ca, P or vitamin D",
                "End-result: soft osteoid → bowed limbs, fractures, pain",
            ])
            .with_notes("Pathology is failure of vascular invasion + mineralisation in metaphysis."),
        SlideSpec::new("Etiology & Risk Factors").with_bullets([
            "Nutritional (90 % of cases)",
            "  – All-meat diet → low Ca, low vitamin D",
            "  – Incorrect raw/cooked homemade diet",
            "  – Excessive Ca (≥3× normal) → secondary rickets-like syndrome in giant breeds",
            "Lack of sunlight → ↓cutaneous vitamin D3",
            "Intestinal malabsorption (parasites, IBD, lymphangiectasia)",
            "Hereditary VD-resistant rickets type II (rare, autosomal recessive – Pomeranians)",
        ]),
        SlideSpec::new("Clinical Signs").with_bullets([
            "Age: 6 – 24 weeks (fast growth phase)",
            "Lameness → reluctance to rise, exercise intolerance",
            "Bone pain on palpation",
            "Swollen metaphyses (wrists, hocks, stifles)",
            "Bowed or angular limbs",
            "Folding fractures of long bones & vertebrae",
            "Stunted growth, loose teeth, alopecia in hereditary forms",
        ]),
        SlideSpec::new("Diagnosis – Clinicopathology").with_bullets([
            "Signalment + dietary history → high index of suspicion",
            "Serum biochemistry",
            "  – ↓ phosphorus (nutritional) or ↓ vitamin D",
            "  – ↑ alkaline phosphatase (osteoblast activity)",
            "  – ± mild hypocalcaemia (advanced)",
            "Assay 25-OH-vitamin D – best reflection of body stores",
            "Rule-out genetic forms via CYP27B1 / VDR gene tests",
        ]),
        SlideSpec::new("Diagnosis – Imaging")
            .with_bullets([
                "Radiographs = gold standard (in vivo)",
                "  – Generalised osteopenia",
                "  – Widened, cupped, irregular growth plates",
                "  – Flared metaphyses",
                "  – Folding fractures",
                "  – Angular limb deformity",
            ])
            .with_image(RICKETS_LATERAL)
            .with_notes("Lateral view of distal radius/ulna shows classic widening and cupping.")
            .with_background(DARK_BLUE),
        SlideSpec::new("Radiographic Gallery – Rickets")
            .with_bullets([
                "Compare with normal contralateral limb",
                "Notice decreased radiopacity of cortices",
                "Growth-plate width > 2 × normal",
                "Secondary joint incongruency may lead to OA later",
            ])
            .with_image(RICKETS_AP)
            .with_notes("AP view of same dog – symmetrical physeal widening.")
            .with_background(DARK_BLUE),
        SlideSpec::new("Treatment").with_bullets([
            "Correct the diet immediately",
            "  – Balanced commercial puppy food (AAFCO growth)",
            "  – Ca:P ratio 1.2–1.4 : 1; vitamin D ≥ 500 IU/1000 kcal",
            "Sunlight exposure 30 min daily (UV-B 290–315 nm)",
            "Specific supplementation if severe",
            "  – Ca carbonate 50–100 mg kg⁻¹/day divided",
            "  – Vitamin D3 (cholecalciferol) 1000–2000 IU/day × 4–6 wk",
            "Analgesia (NSAIDs ± opioids) for pain/fractures",
            "Orthopaedic intervention for pathological fractures",
        ]),
        SlideSpec::new("Prognosis & Management").with_bullets([
            "Excellent if diagnosed early (< 6 mo) & no irreversible physeal damage",
            "Bone pain ↓ within 7–10 days; radiographic healing 4–6 weeks",
            "Gradual resolution of angular deformity during remaining growth",
            "Monitor every 2–4 weeks: body weight, gait, ALP, radiographs",
            "Genetic cases require lifelong vitamin D analogues & Ca",
            "Educate owners: avoid fad diets, feed growth-appropriate ration",
        ]),
        SlideSpec::new("Key Take-Home Messages").with_bullets([
            "Rickets is a preventable nutritional bone disease of puppies",
            "Think of it in any lame, bow-legged, painful youngster",
            "Radiographs give the diagnosis – look at the growth plates!",
            "Treat the cause (diet + sunlight) – not just the bones",
            "Prognosis is excellent with early intervention",
        ]),
    ]
}
