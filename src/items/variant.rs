//! Variant definitions
//!
//! A variant is a named modifier (enhancement bonus, material, or magical
//! property) that can be layered onto a mundane base item.

use serde::{Deserialize, Deserializer, Serialize};

use super::item::{is_vestige_name, BonusFields, ItemCategory, Rarity, TraitFields};

/// Template used when a variant has an option slot but no template of its own
const DEFAULT_OPTION_TEMPLATE: &str = "{label} ({option})";

/// Where a variant's label goes in the composed name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NameRole {
    /// "+2", always the first token
    EnhancementPrefix,
    /// "Mithral", "Adamantine"
    MaterialPrefix,
    /// "Vorpal", "Dancing"
    Prefix,
    /// "of Warning", joined after the base name
    OfSuffix,
}

impl NameRole {
    /// Guess the role from a variant name, for catalogs that don't declare one
    pub fn infer(name: &str) -> NameRole {
        let trimmed = name.trim();
        if leading_plus(trimmed).is_some() {
            NameRole::EnhancementPrefix
        } else if strip_of_prefix(trimmed).is_some() {
            NameRole::OfSuffix
        } else {
            NameRole::Prefix
        }
    }

    pub fn is_prefix(&self) -> bool {
        !matches!(self, NameRole::OfSuffix)
    }

    pub fn name(&self) -> &'static str {
        match self {
            NameRole::EnhancementPrefix => "enhancement-prefix",
            NameRole::MaterialPrefix => "material-prefix",
            NameRole::Prefix => "prefix",
            NameRole::OfSuffix => "of-suffix",
        }
    }

    /// Parse a role keyword, including the older bonus/prefix/suffix buckets
    pub fn parse(raw: &str) -> Option<NameRole> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "enhancement-prefix" | "enhancement" | "bonus" => Some(NameRole::EnhancementPrefix),
            "material-prefix" | "material" => Some(NameRole::MaterialPrefix),
            "prefix" | "free-prefix" => Some(NameRole::Prefix),
            "of-suffix" | "suffix" | "of" => Some(NameRole::OfSuffix),
            _ => None,
        }
    }
}

impl TryFrom<String> for NameRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NameRole::parse(&value).ok_or_else(|| format!("unknown name role '{}'", value))
    }
}

impl From<NameRole> for String {
    fn from(role: NameRole) -> Self {
        role.name().to_string()
    }
}

/// Condition that must hold among the selected variants
///
/// Stored as `{ minEnhancement: N }` so that catalog files read the same
/// in RON and JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PrerequisiteFields", into = "PrerequisiteFields")]
pub enum Prerequisite {
    /// The chosen enhancement bonus must be at least this high
    MinEnhancement(u8),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrerequisiteFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_enhancement: Option<u8>,
}

impl TryFrom<PrerequisiteFields> for Prerequisite {
    type Error = String;

    fn try_from(fields: PrerequisiteFields) -> Result<Self, Self::Error> {
        fields
            .min_enhancement
            .map(Prerequisite::MinEnhancement)
            .ok_or_else(|| "prerequisite needs minEnhancement".to_string())
    }
}

impl From<Prerequisite> for PrerequisiteFields {
    fn from(prereq: Prerequisite) -> Self {
        match prereq {
            Prerequisite::MinEnhancement(min) => PrerequisiteFields {
                min_enhancement: Some(min),
            },
        }
    }
}

impl Prerequisite {
    pub fn is_met(&self, enhancement: i32) -> bool {
        match self {
            Prerequisite::MinEnhancement(min) => enhancement >= *min as i32,
        }
    }

    /// Rules line appended when the condition was not met at composition time
    pub fn warning(&self) -> String {
        match self {
            Prerequisite::MinEnhancement(min) => {
                format!("This item must have a +{} before this enchant may be applied.", min)
            }
        }
    }
}

/// An extra sub-choice a variant needs (damage type, creature type...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSlot {
    /// What is being chosen, for display
    pub kind: String,
    /// Allowed values; empty means free text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// Label template with `{label}` and `{option}` placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl OptionSlot {
    /// Validate a raw choice, returning the canonical spelling if accepted
    pub fn resolve(&self, choice: &str) -> Option<String> {
        let choice = choice.trim();
        if choice.is_empty() {
            return None;
        }
        if self.choices.is_empty() {
            return Some(choice.to_string());
        }
        self.choices
            .iter()
            .find(|c| c.eq_ignore_ascii_case(choice))
            .cloned()
    }

    /// Interpolate a resolved choice into a label
    pub fn render(&self, label: &str, option: &str) -> String {
        self.template
            .as_deref()
            .unwrap_or(DEFAULT_OPTION_TEMPLATE)
            .replace("{label}", label)
            .replace("{name}", label)
            .replace("{option}", option)
    }
}

/// A named modifier that can be layered onto a base item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDefinition {
    pub name: String,
    /// Explicit identity key; falls back to `name`
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "id")]
    pub key: Option<String>,
    /// Token used in rendered names; derived from `name` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub category: ItemCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
    /// Relative rarity step, used only when `rarity` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bump: Option<i8>,
    #[serde(default, alias = "bonusFields", skip_serializing_if = "BonusFields::is_empty")]
    pub bonuses: BonusFields,
    #[serde(default, alias = "traitFields", skip_serializing_if = "TraitFields::is_empty")]
    pub traits: TraitFields,
    /// Rules text fragments, appended in order
    #[serde(
        default,
        alias = "textEntries",
        alias = "text",
        alias = "description",
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub entries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_role: Option<NameRole>,
    /// At most one variant per group may be active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisite: Option<Prerequisite>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub excludes_vestiges: bool,
    #[serde(default, alias = "reqAttune", skip_serializing_if = "is_false")]
    pub attunement_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_slot: Option<OptionSlot>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Accept a single string or a list of strings
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(text) if text.trim().is_empty() => Vec::new(),
        OneOrMany::One(text) => vec![text],
        OneOrMany::Many(list) => list,
    })
}

impl VariantDefinition {
    /// Create a variant with no effects beyond its name
    pub fn new(name: impl Into<String>, category: ItemCategory, role: NameRole) -> Self {
        Self {
            name: name.into(),
            key: None,
            label: None,
            category,
            rarity: None,
            bump: None,
            bonuses: BonusFields::default(),
            traits: TraitFields::default(),
            entries: Vec::new(),
            name_role: Some(role),
            stack_group: None,
            prerequisite: None,
            excludes_vestiges: false,
            attunement_required: false,
            option_slot: None,
        }
    }

    /// Declared name role, or one inferred from the name
    pub fn role(&self) -> NameRole {
        self.name_role
            .unwrap_or_else(|| NameRole::infer(self.label.as_deref().unwrap_or(&self.name)))
    }

    /// Identity key used for hashing and duplicate detection
    pub fn canonical_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }

    /// Token this variant contributes to a rendered name
    pub fn label(&self) -> String {
        if let Some(label) = &self.label {
            return label.trim().to_string();
        }

        let name = self.name.trim();
        match self.role() {
            NameRole::EnhancementPrefix => match leading_plus(name) {
                Some(bonus) => format!("+{}", bonus),
                None => name.to_string(),
            },
            NameRole::OfSuffix => strip_of_prefix(name).unwrap_or(name).trim().to_string(),
            NameRole::MaterialPrefix | NameRole::Prefix => name.to_string(),
        }
    }

    /// Enhancement bonus this variant establishes (0 for non-enhancements)
    pub fn enhancement_bonus(&self) -> i32 {
        if self.role() != NameRole::EnhancementPrefix {
            return 0;
        }
        let from_name = leading_plus(self.label.as_deref().unwrap_or(&self.name)).unwrap_or(0);
        self.bonuses.highest().max(from_name as i32)
    }

    /// Check if this definition is a vestige state rather than a modifier
    pub fn is_vestige(&self) -> bool {
        is_vestige_name(&self.name)
    }
}

/// A selected variant plus its optional sub-choice
#[derive(Debug, Clone, PartialEq)]
pub struct VariantChoice {
    pub variant: VariantDefinition,
    pub option: Option<String>,
}

impl VariantChoice {
    pub fn new(variant: VariantDefinition) -> Self {
        Self { variant, option: None }
    }

    pub fn with_option(variant: VariantDefinition, option: impl Into<String>) -> Self {
        Self {
            variant,
            option: Some(option.into()),
        }
    }

    /// The option choice after validation against the variant's slot
    pub fn resolved_option(&self) -> Option<String> {
        let slot = self.variant.option_slot.as_ref()?;
        slot.resolve(self.option.as_deref()?)
    }

    /// Check if an option was supplied but could not be used
    pub fn option_rejected(&self) -> bool {
        let supplied = self.option.as_deref().is_some_and(|o| !o.trim().is_empty());
        supplied && self.resolved_option().is_none()
    }

    /// Name token with the option interpolated
    pub fn label(&self) -> String {
        let label = self.variant.label();
        match (&self.variant.option_slot, self.resolved_option()) {
            (Some(slot), Some(option)) => slot.render(&label, &option),
            _ => label,
        }
    }

    /// Identity key including the resolved option
    pub fn canonical_key(&self) -> String {
        match self.resolved_option() {
            Some(option) => format!("{}:{}", self.variant.canonical_key(), option),
            None => self.variant.canonical_key().to_string(),
        }
    }

    /// Variant name for provenance lists
    pub fn display_name(&self) -> String {
        match self.resolved_option() {
            Some(option) => format!("{} ({})", self.variant.name, option),
            None => self.variant.name.clone(),
        }
    }
}

/// Parse a leading "+N" token ("+2", "+1 Weapon")
pub fn leading_plus(name: &str) -> Option<u8> {
    let rest = name.trim_start().strip_prefix('+')?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let boundary = rest[digits.len()..].chars().next();
    if boundary.is_some_and(|c| c.is_alphanumeric()) {
        return None;
    }
    digits.parse().ok()
}

/// Strip "of ", "Weapon of ", "Armor of "... from the front of a suffix name
fn strip_of_prefix(name: &str) -> Option<&str> {
    let lower = name.to_ascii_lowercase();
    for lead in ["weapon of ", "armor of ", "shield of ", "ammunition of ", "of "] {
        if lower.starts_with(lead) {
            return Some(&name[lead.len()..]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slaying() -> VariantDefinition {
        let mut variant = VariantDefinition::new("of Slaying", ItemCategory::Weapon, NameRole::OfSuffix);
        variant.option_slot = Some(OptionSlot {
            kind: "creature type".into(),
            choices: vec!["Dragons".into(), "Giants".into()],
            template: None,
        });
        variant
    }

    #[test]
    fn test_role_inference() {
        assert_eq!(NameRole::infer("+1 Weapon"), NameRole::EnhancementPrefix);
        assert_eq!(NameRole::infer("of Warning"), NameRole::OfSuffix);
        assert_eq!(NameRole::infer("Armor of Resistance"), NameRole::OfSuffix);
        assert_eq!(NameRole::infer("Vorpal"), NameRole::Prefix);
    }

    #[test]
    fn test_role_keywords() {
        assert_eq!(NameRole::parse("of-suffix"), Some(NameRole::OfSuffix));
        assert_eq!(NameRole::parse("bonus"), Some(NameRole::EnhancementPrefix));
        assert_eq!(NameRole::parse("Material_Prefix"), Some(NameRole::MaterialPrefix));
        assert_eq!(NameRole::parse("sideways"), None);
        let json = serde_json::to_string(&NameRole::EnhancementPrefix).unwrap();
        assert_eq!(json, "\"enhancement-prefix\"");
    }

    #[test]
    fn test_labels() {
        let plus = VariantDefinition::new("+2 Armor", ItemCategory::Armor, NameRole::EnhancementPrefix);
        assert_eq!(plus.label(), "+2");
        assert_eq!(plus.enhancement_bonus(), 2);

        let warning = VariantDefinition::new("Weapon of Warning", ItemCategory::Weapon, NameRole::OfSuffix);
        assert_eq!(warning.label(), "Warning");

        let mithral = VariantDefinition::new("Mithral", ItemCategory::Armor, NameRole::MaterialPrefix);
        assert_eq!(mithral.label(), "Mithral");
        assert_eq!(mithral.enhancement_bonus(), 0);
    }

    #[test]
    fn test_leading_plus() {
        assert_eq!(leading_plus("+3"), Some(3));
        assert_eq!(leading_plus(" +1 Weapon"), Some(1));
        assert_eq!(leading_plus("+1a"), None);
        assert_eq!(leading_plus("Vicious"), None);
    }

    #[test]
    fn test_option_interpolation() {
        let choice = VariantChoice::with_option(slaying(), "dragons");
        assert_eq!(choice.resolved_option().as_deref(), Some("Dragons"));
        assert_eq!(choice.label(), "Slaying (Dragons)");
        assert_eq!(choice.canonical_key(), "of Slaying:Dragons");
        assert_eq!(choice.display_name(), "of Slaying (Dragons)");
    }

    #[test]
    fn test_option_rejected_outside_choices() {
        let choice = VariantChoice::with_option(slaying(), "Teapots");
        assert!(choice.option_rejected());
        assert_eq!(choice.label(), "Slaying");
        assert_eq!(choice.canonical_key(), "of Slaying");

        let blank = VariantChoice::with_option(slaying(), "  ");
        assert!(!blank.option_rejected());
    }

    #[test]
    fn test_prerequisite() {
        let prereq = Prerequisite::MinEnhancement(3);
        assert!(!prereq.is_met(2));
        assert!(prereq.is_met(3));
        assert_eq!(prereq.warning(), "This item must have a +3 before this enchant may be applied.");
    }

    #[test]
    fn test_deserialize_legacy_fields() {
        let json = r#"{
            "name": "of Warning",
            "category": "weapon",
            "rarity": "uncommon",
            "nameRole": "of-suffix",
            "textEntries": "You can't be surprised while carrying this weapon.",
            "bonusFields": { "attack": 1 },
            "traitFields": { "property": ["Thrown"] },
            "excludesVestiges": true
        }"#;
        let variant: VariantDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(variant.rarity, Some(Rarity::Uncommon));
        assert_eq!(variant.role(), NameRole::OfSuffix);
        assert_eq!(variant.entries.len(), 1);
        assert_eq!(variant.bonuses.attack, Some(1));
        assert_eq!(variant.traits.properties, vec!["Thrown"]);
        assert!(variant.excludes_vestiges);
        assert!(!variant.attunement_required);
    }

    #[test]
    fn test_prerequisite_shape() {
        let json = serde_json::to_string(&Prerequisite::MinEnhancement(3)).unwrap();
        assert_eq!(json, r#"{"minEnhancement":3}"#);
        let back: Prerequisite = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Prerequisite::MinEnhancement(3));
        assert!(serde_json::from_str::<Prerequisite>("{}").is_err());

        let variant: VariantDefinition = serde_json::from_str(
            r#"{"name":"Vorpal","category":"weapon","prerequisite":{"minEnhancement":3},"reqAttune":true}"#,
        )
        .unwrap();
        assert_eq!(variant.prerequisite, Some(Prerequisite::MinEnhancement(3)));
        assert!(variant.attunement_required);
    }
}
