//! Role and ban-matrix permission checks.
//!
//! Every permission check is expressed uniformly as "does the actor's role
//! meet a threshold" or "is this ban type active".

use crate::db::{BanRepository, BanType, Group, Member};
use crate::engine::Role;
use crate::error::{OperationError, OperationResult};

/// Require `member`'s role to be at least `min_role`.
pub fn validate_role(member: &Member, min_role: Role) -> OperationResult<()> {
    if member.role() >= min_role {
        Ok(())
    } else {
        Err(OperationError::PermissionDenied)
    }
}

/// Is `member` currently restricted by `ban_type`, considering both their own
/// ban matrix entries and (if `check_group`) the group-wide default mask.
pub async fn check_ban(
    bans: &BanRepository<'_>,
    group: &Group,
    member: &Member,
    ban_type: BanType,
    check_group: bool,
) -> OperationResult<bool> {
    if bans
        .is_banned(group.id, member.id, ban_type)
        .await
        .map_err(|e| OperationError::msg(e.to_string()))?
    {
        return Ok(true);
    }

    Ok(check_group && group.group_wide_ban(ban_type))
}

/// Same as [`check_ban`] but raises `OperationError` instead of returning a
/// bool, for call sites that want to short-circuit with `?`.
pub async fn require_not_banned(
    bans: &BanRepository<'_>,
    group: &Group,
    member: &Member,
    ban_type: BanType,
    check_group: bool,
) -> OperationResult<()> {
    if check_ban(bans, group, member, ban_type, check_group).await? {
        Err(OperationError::PermissionDenied)
    } else {
        Ok(())
    }
}

/// Permission escalation rules for ban/unban/promote:
/// - to act on a target role >= ADMIN, actor must be >= ADMIN_ADMIN
/// - to act on a target role >= ADMIN_ADMIN, actor must be CREATOR
/// - an actor may never target themselves
/// - an actor may never act on a target whose role >= their own
pub fn validate_escalation(actor: &Member, target: &Member) -> OperationResult<()> {
    if actor.id == target.id {
        return Err(OperationError::PermissionDenied);
    }

    if target.role() >= actor.role() {
        return Err(OperationError::PermissionDenied);
    }

    if target.role() >= Role::AdminAdmin && actor.role() < Role::Creator {
        return Err(OperationError::PermissionDenied);
    }

    if target.role() >= Role::Admin && actor.role() < Role::AdminAdmin {
        return Err(OperationError::PermissionDenied);
    }

    Ok(())
}

/// Is this member currently eligible to receive fan-out operations at all
/// (role above LEFT and not group-kicked/BANNED)?
pub fn is_fanout_eligible(member: &Member) -> bool {
    member.role() > Role::Left && member.role() != Role::Banned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, RoleColumn};

    fn member_with_role(id: i64, role: Role) -> Member {
        Member {
            id,
            user_id: id,
            group_id: 1,
            role: RoleColumn(role),
            pinned_mask: None,
            last_mask: None,
            last_activity: 0,
            n_messages: 0,
            created_at: 0,
        }
    }

    #[test]
    fn validate_role_checks_threshold() {
        let member = member_with_role(1, Role::Member);
        assert!(validate_role(&member, Role::Guest).is_ok());
        assert!(validate_role(&member, Role::Admin).is_err());
    }

    #[test]
    fn escalation_rejects_self_target() {
        let actor = member_with_role(1, Role::Creator);
        assert!(validate_escalation(&actor, &actor).is_err());
    }

    #[test]
    fn escalation_requires_creator_for_admin_admin_target() {
        let actor = member_with_role(1, Role::Admin);
        let target = member_with_role(2, Role::AdminAdmin);
        assert!(validate_escalation(&actor, &target).is_err());

        let creator = member_with_role(3, Role::Creator);
        assert!(validate_escalation(&creator, &target).is_ok());
    }

    #[test]
    fn escalation_rejects_denial_example_from_scenarios() {
        // ADMIN_BAN actor attempting to act on an ADMIN target is denied.
        let actor = member_with_role(1, Role::AdminBan);
        let target = member_with_role(2, Role::Admin);
        assert!(validate_escalation(&actor, &target).is_err());
    }

    #[test]
    fn fanout_eligibility_excludes_left_and_banned() {
        assert!(!is_fanout_eligible(&member_with_role(1, Role::Left)));
        assert!(!is_fanout_eligible(&member_with_role(1, Role::Banned)));
        assert!(is_fanout_eligible(&member_with_role(1, Role::Guest)));
    }

    #[tokio::test]
    async fn check_ban_considers_group_default_mask() {
        let db = Database::new(":memory:").await.unwrap();
        let user = db.users().find_or_create("tg:1", "Alice").await.unwrap();
        let mut group = db.groups().create("anonchat", "123:abc", user.id).await.unwrap();
        let member = db.members().join_or_get(user.id, group.id).await.unwrap();

        assert!(!check_ban(&db.bans(), &group, &member, BanType::Media, true).await.unwrap());

        db.groups()
            .set_default_ban_mask(group.id, BanType::Media.bit())
            .await
            .unwrap();
        group = db.groups().find_by_id(group.id).await.unwrap();

        assert!(check_ban(&db.bans(), &group, &member, BanType::Media, true).await.unwrap());
        assert!(!check_ban(&db.bans(), &group, &member, BanType::Media, false).await.unwrap());
    }
}
