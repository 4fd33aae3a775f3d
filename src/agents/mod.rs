//! Agent definitions
//!
//! Declarative description of the agent tree: a root agent delegating to
//! the inquiry, map and medicine specialists. Hosting frameworks read this
//! to wire up models, prompts and tools.

pub mod prompts;

use serde::{Serialize, Serializer};

use crate::{config::Config, tools::ToolName};

/// A tool an agent may call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolRef {
    /// A tool served by the local tool registry
    Function { name: &'static str },
    /// A remote MCP toolset reached over SSE
    McpToolset {
        #[serde(serialize_with = "serialize_without_query")]
        url: String,
    },
}

impl From<ToolName> for ToolRef {
    fn from(tool: ToolName) -> Self {
        ToolRef::Function {
            name: tool.as_str(),
        }
    }
}

/// One agent in the tree
#[derive(Debug, Clone, Serialize)]
pub struct AgentSpec {
    pub name: &'static str,
    pub model: String,
    pub description: &'static str,
    pub instruction: &'static str,
    pub tools: Vec<ToolRef>,
    pub sub_agents: Vec<AgentSpec>,
}

impl AgentSpec {
    /// Find this agent or a descendant by name
    pub fn find(&self, name: &str) -> Option<&AgentSpec> {
        if self.name == name {
            return Some(self);
        }
        self.sub_agents.iter().find_map(|agent| agent.find(name))
    }
}

/// The full agent tree
pub fn root_agent(config: &Config) -> AgentSpec {
    AgentSpec {
        name: "root",
        model: config.agent_model.clone(),
        description: "Routes medical questions to the right specialist",
        instruction: prompts::ROOT_PROMPT,
        tools: vec![],
        sub_agents: vec![
            inquiry_agent(config),
            map_agent(config),
            medicine_agent(config),
        ],
    }
}

pub fn inquiry_agent(config: &Config) -> AgentSpec {
    AgentSpec {
        name: "inquiry",
        model: config.agent_model.clone(),
        description: "Symptom consultation and skin image diagnosis",
        instruction: prompts::INQUIRY_PROMPT,
        tools: vec![
            ToolName::AskDoctor.into(),
            ToolName::SkinDiseaseQuery.into(),
            ToolName::RenderReport.into(),
        ],
        sub_agents: vec![],
    }
}

pub fn map_agent(config: &Config) -> AgentSpec {
    AgentSpec {
        name: "map",
        model: config.agent_model.clone(),
        description: "Finds hospitals, clinics and pharmacies",
        instruction: prompts::MAP_PROMPT,
        tools: vec![ToolRef::McpToolset {
            url: map_toolset_url(config),
        }],
        sub_agents: vec![],
    }
}

pub fn medicine_agent(config: &Config) -> AgentSpec {
    AgentSpec {
        name: "medicine",
        model: config.agent_model.clone(),
        description: "Drug questions and medicine package reading",
        instruction: prompts::MEDICINE_PROMPT,
        tools: vec![ToolName::ConsultDrug.into(), ToolName::RecognizeText.into()],
        sub_agents: vec![],
    }
}

/// Pre-signed SSE URL of the map toolset
pub fn map_toolset_url(config: &Config) -> String {
    match &config.map_mcp_key {
        Some(key) => format!("{}?key={}", config.map_mcp_url, key),
        None => config.map_mcp_url.clone(),
    }
}

// The map key travels in the query string; never publish it.
fn serialize_without_query<S: Serializer>(url: &str, serializer: S) -> Result<S::Ok, S::Error> {
    let base = url.split_once('?').map(|(base, _)| base).unwrap_or(url);
    serializer.serialize_str(base)
}
