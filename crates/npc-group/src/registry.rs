//! Owner of every group and of the agent → group index.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use npc_core::{AgentId, GroupId, Vec3};
use npc_spatial::NavQuery;

use crate::{AlertEvent, Group, GroupConfig, GroupError, GroupResult, MemberView, Reaction};

/// Groups keyed by id (iterated in id order) plus a membership index so an
/// agent's group resolves in O(1).
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: BTreeMap<GroupId, Group>,
    membership: FxHashMap<AgentId, GroupId>,
    next_id: u32,
    config: GroupConfig,
}

impl GroupRegistry {
    pub fn new(config: GroupConfig) -> GroupResult<Self> {
        config.validate()?;
        Ok(Self { config, ..Self::default() })
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> + '_ {
        self.groups.values()
    }

    pub fn group_of(&self, agent: AgentId) -> Option<GroupId> {
        self.membership.get(&agent).copied()
    }

    fn open_group(&mut self, name: String) -> GroupId {
        let id = GroupId(self.next_id);
        self.next_id += 1;
        self.groups.insert(id, Group::new(id, name, self.config.clone()));
        id
    }

    /// Statically authored group.  Fails without side effects if any member
    /// is already grouped or the list exceeds `max_size`.
    pub fn create_group<V: MemberView + ?Sized>(
        &mut self,
        name: impl Into<String>,
        members: &[AgentId],
        view: &V,
    ) -> GroupResult<GroupId> {
        if members.is_empty() {
            return Err(GroupError::EmptyGroup);
        }
        if let Some((&agent, &group)) =
            members.iter().find_map(|a| self.membership.get_key_value(a))
        {
            return Err(GroupError::AlreadyGrouped { agent, group });
        }
        if members.len() > self.config.max_size {
            return Err(GroupError::GroupFull { group: GroupId(self.next_id), max: self.config.max_size });
        }

        let id = self.open_group(name.into());
        let group = self.groups.get_mut(&id).ok_or(GroupError::UnknownGroup(id))?;
        for &agent in members {
            group.add(agent, view)?;
            self.membership.insert(agent, id);
        }
        tracing::debug!(group = %id, members = members.len(), "group created");
        Ok(id)
    }

    /// Proximity + archetype assignment.  Joins the nearest non-full group
    /// within `assignment_radius` that already has a member of the same
    /// archetype, else the nearest non-full group in range, else founds a
    /// new group.  Already-grouped agents keep their group.
    pub fn assign<V: MemberView + ?Sized>(&mut self, agent: AgentId, view: &V) -> GroupResult<GroupId> {
        if let Some(id) = self.group_of(agent) {
            return Ok(id);
        }
        let info = view.living(agent).ok_or(GroupError::UnknownAgent(agent))?;

        let radius = self.config.assignment_radius;
        let mut same: Option<(f32, GroupId)> = None;
        let mut any: Option<(f32, GroupId)> = None;
        for group in self.groups.values().filter(|g| !g.is_full()) {
            let Some(center) = group.center(view) else { continue };
            let d = center.distance_xz(info.position);
            if d > radius {
                continue;
            }
            let kin = group
                .members()
                .iter()
                .filter_map(|&m| view.member(m))
                .any(|m| m.archetype == info.archetype);
            let slot = if kin { &mut same } else { &mut any };
            if slot.is_none_or(|(best, _)| d < best) {
                *slot = Some((d, group.id()));
            }
        }

        let id = match same.or(any) {
            Some((_, id)) => id,
            None => self.open_group(format!("{}-{}", info.archetype, self.next_id)),
        };
        let group = self.groups.get_mut(&id).ok_or(GroupError::UnknownGroup(id))?;
        group.add(agent, view)?;
        self.membership.insert(agent, id);
        Ok(id)
    }

    /// [`assign`](Self::assign) every id in order.
    pub fn assign_all<V, I>(&mut self, agents: I, view: &V) -> GroupResult<()>
    where
        V: MemberView + ?Sized,
        I: IntoIterator<Item = AgentId>,
    {
        for agent in agents {
            self.assign(agent, view)?;
        }
        Ok(())
    }

    /// Forget `agent`.  A group left empty is dissolved.
    pub fn remove_agent<V: MemberView + ?Sized>(&mut self, agent: AgentId, view: &V) -> Option<GroupId> {
        let id = self.membership.remove(&agent)?;
        if let Some(group) = self.groups.get_mut(&id) {
            group.remove(agent, view);
            if group.is_empty() {
                self.groups.remove(&id);
                tracing::debug!(group = %id, "group dissolved");
            }
        }
        Some(id)
    }

    /// Broadcast to the originating agent's group.  Environment events and
    /// ungrouped origins reach no group.
    pub fn broadcast<V: MemberView + ?Sized>(
        &mut self,
        event: AlertEvent,
        view: &V,
        nav: &dyn NavQuery,
    ) -> Vec<Reaction> {
        match event.origin.and_then(|a| self.group_of(a)) {
            Some(id) => self.broadcast_to(id, event, view, nav).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    pub fn broadcast_to<V: MemberView + ?Sized>(
        &mut self,
        id: GroupId,
        event: AlertEvent,
        view: &V,
        nav: &dyn NavQuery,
    ) -> GroupResult<Vec<Reaction>> {
        let group = self.groups.get_mut(&id).ok_or(GroupError::UnknownGroup(id))?;
        let reactions = group.broadcast(event, view, nav);
        self.sync_membership(id);
        Ok(reactions)
    }

    /// Tick every group.  Reactions come out in group id order.
    pub fn update_all<V: MemberView + ?Sized>(
        &mut self,
        dt: f32,
        now: f64,
        view: &V,
        nav: &dyn NavQuery,
    ) -> Vec<Reaction> {
        let mut reactions = Vec::new();
        let ids: Vec<GroupId> = self.groups.keys().copied().collect();
        for id in ids {
            if let Some(group) = self.groups.get_mut(&id) {
                reactions.extend(group.update(dt, now, view, nav));
            }
            self.sync_membership(id);
        }
        reactions
    }

    pub fn coordinate_attack<V: MemberView + ?Sized>(
        &self,
        id: GroupId,
        target: Vec3,
        view: &V,
        nav: &dyn NavQuery,
    ) -> GroupResult<Vec<Reaction>> {
        let group = self.groups.get(&id).ok_or(GroupError::UnknownGroup(id))?;
        Ok(group.coordinate_attack(target, view, nav))
    }

    pub fn coordinate_retreat<V: MemberView + ?Sized>(
        &self,
        id: GroupId,
        fallback: Vec3,
        view: &V,
        nav: &dyn NavQuery,
    ) -> GroupResult<Vec<Reaction>> {
        let group = self.groups.get(&id).ok_or(GroupError::UnknownGroup(id))?;
        Ok(group.coordinate_retreat(fallback, view, nav))
    }

    /// Drop index entries for agents the group pruned, and the group itself
    /// once empty.
    fn sync_membership(&mut self, id: GroupId) {
        let Some(group) = self.groups.get(&id) else { return };
        if group.is_empty() {
            self.groups.remove(&id);
            self.membership.retain(|_, g| *g != id);
            tracing::debug!(group = %id, "group dissolved");
        } else {
            let group = &*group;
            self.membership.retain(|a, g| *g != id || group.contains(*a));
        }
    }
}
