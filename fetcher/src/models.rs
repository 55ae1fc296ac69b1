use pimonitor_core::{Document, DocumentId};
use serde::{Deserialize, Serialize};

/// Substituted for any field the API leaves out.
pub const PLACEHOLDER: &str = "N/A";

fn or_placeholder(v: Option<String>) -> String {
    v.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn num_or_placeholder(v: Option<u64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string())
}

// Wire shapes. Every field is optional; conversion fills the gaps.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiRepresentative {
    pub id: Option<u64>,
    pub nome: Option<String>,
    pub sigla_partido: Option<String>,
    pub sigla_uf: Option<String>,
    pub email: Option<String>,
    pub situacao: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiRepresentativeDetail {
    pub id: Option<u64>,
    pub nome_civil: Option<String>,
    #[serde(default)]
    pub ultimo_status: Option<ApiRepresentative>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiProposal {
    pub id: Option<u64>,
    pub sigla_tipo: Option<String>,
    pub numero: Option<u64>,
    pub ano: Option<u64>,
    pub ementa: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiTheme {
    pub tema: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representative {
    pub id: u64,
    pub name: String,
    pub party: String,
    pub state: String,
    pub email: String,
    pub status: String,
}

impl Representative {
    pub(crate) fn from_api(raw: ApiRepresentative) -> Option<Self> {
        Some(Self {
            id: raw.id?,
            name: or_placeholder(raw.nome),
            party: or_placeholder(raw.sigla_partido),
            state: or_placeholder(raw.sigla_uf),
            email: or_placeholder(raw.email),
            status: or_placeholder(raw.situacao),
        })
    }

    /// Detail payloads keep the current fields under `ultimoStatus`.
    pub(crate) fn from_detail(raw: ApiRepresentativeDetail) -> Option<Self> {
        let status = raw.ultimo_status.unwrap_or_default();
        Some(Self {
            id: raw.id.or(status.id)?,
            name: or_placeholder(status.nome.or(raw.nome_civil)),
            party: or_placeholder(status.sigla_partido),
            state: or_placeholder(status.sigla_uf),
            email: or_placeholder(status.email),
            status: or_placeholder(status.situacao),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub type_code: String,
    pub number: String,
    pub year: String,
    pub summary: String,
    #[serde(default)]
    pub themes: Vec<String>,
}

impl Proposal {
    pub(crate) fn from_api(raw: ApiProposal) -> Option<Self> {
        Some(Self {
            id: raw.id?,
            type_code: or_placeholder(raw.sigla_tipo),
            number: num_or_placeholder(raw.numero),
            year: num_or_placeholder(raw.ano),
            summary: or_placeholder(raw.ementa),
            themes: Vec::new(),
        })
    }

    /// e.g. `PL 1234/2023`
    pub fn label(&self) -> String { format!("{} {}/{}", self.type_code, self.number, self.year) }

    /// The summary as an analyzable document; a placeholder summary becomes empty text.
    pub fn as_document(&self) -> Document {
        let text = if self.summary == PLACEHOLDER { None } else { Some(self.summary.clone()) };
        let date = if self.year == PLACEHOLDER { None } else { Some(self.year.clone()) };
        Document { id: DocumentId::from(self.id), date, text }
    }
}
