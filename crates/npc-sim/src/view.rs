use npc_agent::AgentArena;
use npc_core::AgentId;
use npc_group::{MemberInfo, MemberView};

/// Group-facing view of the arena.
pub(crate) struct ArenaView<'a>(pub &'a AgentArena);

impl MemberView for ArenaView<'_> {
    fn member(&self, id: AgentId) -> Option<MemberInfo> {
        self.0.get(id).map(|a| MemberInfo {
            id,
            archetype: a.archetype(),
            position: a.position(),
            intelligence: a.body().params().intelligence,
            state: a.state(),
            alive: a.is_alive(),
        })
    }
}
