//! The fixed set of files every agent produces.
//!
//! | Component    | File name            | Marker line                |
//! |--------------|----------------------|----------------------------|
//! | SequenceItem | `<agent>_seq_item.sv`  | `// File: <agent>_seq_item.sv`  |
//! | Config       | `<agent>_config.sv`    | `// File: <agent>_config.sv`    |
//! | Driver       | `<agent>_driver.sv`    | `// File: <agent>_driver.sv`    |
//! | Monitor      | `<agent>_monitor.sv`   | `// File: <agent>_monitor.sv`   |
//! | Sequencer    | `<agent>_sequencer.sv` | `// File: <agent>_sequencer.sv` |
//! | Agent        | `<agent>_agent.sv`     | `// File: <agent>_agent.sv`     |
//! | Interface    | `<agent>_if.sv`        | `// File: <agent>_if.sv`        |

use uvmgen_core::AgentName;

use crate::splitter::ComponentDescriptor;

/// Text that precedes the file name on every marker line.
pub const MARKER_PREFIX: &str = "// File: ";

/// One generated file of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentComponent {
    SequenceItem,
    Config,
    Driver,
    Monitor,
    Sequencer,
    Agent,
    Interface,
}

impl AgentComponent {
    /// All components in a stable order.
    pub fn all() -> &'static [AgentComponent] {
        &[
            AgentComponent::SequenceItem,
            AgentComponent::Config,
            AgentComponent::Driver,
            AgentComponent::Monitor,
            AgentComponent::Sequencer,
            AgentComponent::Agent,
            AgentComponent::Interface,
        ]
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            AgentComponent::SequenceItem => "seq_item.sv",
            AgentComponent::Config       => "config.sv",
            AgentComponent::Driver       => "driver.sv",
            AgentComponent::Monitor      => "monitor.sv",
            AgentComponent::Sequencer    => "sequencer.sv",
            AgentComponent::Agent        => "agent.sv",
            AgentComponent::Interface    => "if.sv",
        }
    }

    /// `<agent>_<suffix>`
    pub fn file_name(&self, agent: &AgentName) -> String {
        format!("{}_{}", agent, self.suffix())
    }

    /// `// File: <agent>_<suffix>`
    pub fn marker(&self, agent: &AgentName) -> String {
        format!("{MARKER_PREFIX}{}", self.file_name(agent))
    }

    pub fn descriptor(&self, agent: &AgentName) -> ComponentDescriptor {
        ComponentDescriptor::new(self.suffix(), self.marker(agent))
    }

    /// Descriptors for every component of `agent`, in [`AgentComponent::all`] order.
    pub fn descriptors(agent: &AgentName) -> Vec<ComponentDescriptor> {
        Self::all().iter().map(|c| c.descriptor(agent)).collect()
    }
}
