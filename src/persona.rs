//! Susana's fixed texts
//!
//! The system instructions sent to the remote model, the welcome line that
//! seeds an empty log, the demo-mode notice, apology lines used when the
//! remote model fails, and the canned quick actions.

use serde::Serialize;
use std::str::FromStr;

/// System instructions establishing the persona
pub const SYSTEM_PROMPT: &str = r#"ERES SUSANA.
Edad: 14 años (aprox). Rol: Campesina aislada.
PERSONALIDAD: Alegría Radical, Ingenuidad Absoluta, Carisma Servicial.
RESTRICCIONES CRÍTICAS (NO ROMPER):
1. NO conoces tecnología (celular="piedra brillante", avión="pájaro de metal").
2. NO sabes de fechas/horas modernas (mides tiempo por el sol o cosechas).
3. NO sabes anatomía científica (corazón="pajarito en el pecho").
4. Eres analfabeta funcional: tu inteligencia es empírica y emocional.
ESTILO DE HABLA:
- Dulce, curioso, entusiasta.
- Usa metáforas de granja y naturaleza.
- Nunca uses jerga moderna ("ok", "cool").
- Si el usuario menciona algo moderno, interprétalo con magia o naturaleza.
ACCIONES:
- Texto entre asteriscos, corchetes o paréntesis describe lo que el usuario HACE, no lo que dice.
  Reacciona a la acción como lo haría Susana."#;

/// First message of every fresh conversation
pub const WELCOME_MESSAGE: &str =
    "¡Hola! ¿Tú eres el que llegó por el camino viejo? ¡Cuidado con las ortigas!";

/// Marks assistant text produced while no credential was available.
/// Messages carrying it are never replayed to the remote model.
pub const DEMO_MARKER: &str = "🌱 modo demostración";

/// Suffix appended to demo replies when demo mode is disclosed
pub const DEMO_NOTICE: &str =
    "\n\n_(🌱 modo demostración: sin llave de Gemini, Susana responde de memoria.)_";

const APOLOGIES: &[&str] = &[
    "¡Ay! Se me enredaron las ideas como lana en las patas del gato. ¿Me lo repites?",
    "Perdona, me distraje mirando una nube con forma de gallina. ¿Qué decías?",
    "¡Uy! El viento se llevó tus palabras antes de que llegaran a mis orejas.",
];

/// True for system-authored notices that are not part of the dialogue
pub fn is_system_notice(content: &str) -> bool {
    content.contains(DEMO_MARKER)
}

/// An in-persona apology carrying a short error tag, e.g. `(red)`
pub fn apology(tag: &str, pick: usize) -> String {
    let line = APOLOGIES[pick % APOLOGIES.len()];
    format!("{line} ({tag})")
}

pub fn apology_lines() -> &'static [&'static str] {
    APOLOGIES
}

// ============================================================
// Quick actions
// ============================================================

/// Canned actions a caller can submit as if the user typed them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    Greet,
    Approach,
    OfferGift,
    Observe,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        QuickAction::Greet,
        QuickAction::Approach,
        QuickAction::OfferGift,
        QuickAction::Observe,
    ];

    /// Path segment used by the API
    pub fn slug(self) -> &'static str {
        match self {
            QuickAction::Greet => "saludar",
            QuickAction::Approach => "acercarse",
            QuickAction::OfferGift => "regalar",
            QuickAction::Observe => "observar",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuickAction::Greet => "👋 Saludar",
            QuickAction::Approach => "🚶 Acercarse",
            QuickAction::OfferGift => "🎁 Dar un regalo",
            QuickAction::Observe => "👀 Observar",
        }
    }

    /// The text submitted on the user's behalf, written as an action
    pub fn text(self) -> &'static str {
        match self {
            QuickAction::Greet => "*Te saludo con la mano desde lejos*",
            QuickAction::Approach => "*Me acerco despacio por el camino*",
            QuickAction::OfferGift => "*Te ofrezco un regalo envuelto en un pañuelo*",
            QuickAction::Observe => "*Observo la granja con curiosidad*",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown quick action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for QuickAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "saludar" | "greet" => Ok(QuickAction::Greet),
            "acercarse" | "approach" => Ok(QuickAction::Approach),
            "regalar" | "offer_gift" | "offer-gift" | "gift" => Ok(QuickAction::OfferGift),
            "observar" | "observe" => Ok(QuickAction::Observe),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}
