//! The standard screen map
//!
//! One [`Pages`] value wires every known screen into a [`PageGraph`]
//! and keeps named handles for the screens tasks navigate to. The
//! shared [`PAGES`] instance is built on first use.

use once_cell::sync::Lazy;

use crate::ui::assets::*;
use crate::ui::page::{PageGraph, PageId};

/// The screen graph plus handles to every registered screen
pub struct Pages {
    /// Wired screen graph
    pub graph: PageGraph,
    pub main: PageId,
    pub reward: PageId,
    pub destroy: PageId,
    pub friend: PageId,
    pub daily: PageId,
    pub shop: PageId,
    pub cash_shop: PageId,
    pub team: PageId,
    pub inventory: PageId,
    pub pass: PageId,
    pub conversation: PageId,
    pub ark: PageId,
    pub tribe_tower: PageId,
    pub interception: PageId,
    pub special_interception: PageId,
    pub simulation_room: PageId,
    pub arena: PageId,
    pub rookie_arena: PageId,
    pub special_arena: PageId,
    pub outpost: PageId,
    pub commission: PageId,
    pub mailbox: PageId,
    pub recruit: PageId,
    pub ranking: PageId,
}

impl Pages {
    /// Build the standard map
    ///
    /// Registration order doubles as detection priority, so the home
    /// screen comes first. Seasonal event screens are wired by their
    /// own modules, not here.
    pub fn standard() -> Self {
        let mut g = PageGraph::new();

        let main = g.page("main", MAIN_CHECK);
        let reward = g.page("reward", REWARD_CHECK);
        let destroy = g.page("destroy", DESTROY_CHECK);
        let friend = g.page("friend", FRIEND_CHECK);
        let daily = g.page("daily", DAILY_CHECK);
        let shop = g.page("shop", SHOP_CHECK);
        let cash_shop = g.page("cash_shop", CASH_SHOP_CHECK);
        let team = g.page("team", TEAM_CHECK);
        let inventory = g.page("inventory", INVENTORY_CHECK);
        let pass = g.page("pass", PASS_CHECK);
        let conversation = g.page("conversation", CONVERSATION_CHECK);
        let ark = g.page("ark", ARK_CHECK);
        let tribe_tower = g.page("tribe_tower", TRIBE_TOWER_CHECK);
        let interception = g.page("interception", INTERCEPTION_CHECK);
        let special_interception = g.page("special_interception", SPECIAL_INTERCEPTION_CHECK);
        let simulation_room = g.page("simulation_room", SIMULATION_ROOM_CHECK);
        let arena = g.page("arena", ARENA_CHECK);
        let rookie_arena = g.page("rookie_arena", ROOKIE_ARENA_CHECK);
        let special_arena = g.page("special_arena", SPECIAL_ARENA_CHECK);
        let outpost = g.page("outpost", OUTPOST_CHECK);
        let commission = g.page("commission", COMMISSION_CHECK);
        let mailbox = g.page("mailbox", MAILBOX_CHECK);
        let recruit = g.page("recruit", RECRUIT_CHECK);
        let ranking = g.page("ranking", RANKING_CHECK);

        g.link(reward, main, REWARD_GOTO_MAIN);
        g.link(main, reward, MAIN_GOTO_REWARD);

        g.link(destroy, reward, DESTROY_GOTO_REWARD);
        g.link(reward, destroy, REWARD_GOTO_DESTROY);

        g.link(friend, main, FRIEND_GOTO_MAIN);
        g.link(main, friend, MAIN_GOTO_FRIEND);

        g.link(daily, main, DAILY_GOTO_MAIN);
        g.link(main, daily, MAIN_GOTO_DAILY);

        g.link(shop, main, GOTO_BACK);
        g.link(main, shop, MAIN_GOTO_SHOP);

        g.link(cash_shop, main, GOTO_BACK);
        g.link(main, cash_shop, MAIN_GOTO_CASH_SHOP);

        g.link(team, main, TEAM_GOTO_MAIN);
        g.link(main, team, MAIN_GOTO_TEAM);

        // Squad sub-screens reuse the squad top bar
        g.link(inventory, main, TEAM_GOTO_MAIN);
        g.link(main, inventory, MAIN_GOTO_INVENTORY);

        g.link(pass, main, PASS_GOTO_MAIN);
        g.link(main, pass, MAIN_GOTO_PASS);

        g.link(conversation, team, GOTO_BACK);
        g.link(conversation, main, GOTO_MAIN);
        g.link(team, conversation, TEAM_GOTO_CONVERSATION);

        g.link(ark, main, GOTO_BACK);
        g.link(main, ark, MAIN_GOTO_ARK);

        g.link(tribe_tower, ark, GOTO_BACK);
        g.link(tribe_tower, main, GOTO_MAIN);
        g.link(ark, tribe_tower, ARK_GOTO_TRIBE_TOWER);

        g.link(interception, ark, GOTO_BACK);
        g.link(interception, main, GOTO_MAIN);
        g.link(ark, interception, ARK_GOTO_INTERCEPTION);

        // Entry is seasonal and wired elsewhere; only the way out is fixed
        g.link(special_interception, interception, GOTO_BACK);
        g.link(special_interception, main, GOTO_MAIN);

        g.link(simulation_room, ark, GOTO_BACK);
        g.link(simulation_room, main, GOTO_MAIN);
        g.link(ark, simulation_room, ARK_GOTO_SIMULATION_ROOM);

        g.link(arena, ark, GOTO_BACK);
        g.link(arena, main, GOTO_MAIN);
        g.link(ark, arena, ARK_GOTO_ARENA);

        g.link(rookie_arena, arena, GOTO_BACK);
        g.link(rookie_arena, main, GOTO_MAIN);
        g.link(arena, rookie_arena, ARENA_GOTO_ROOKIE_ARENA);

        g.link(special_arena, arena, GOTO_BACK);
        g.link(special_arena, main, GOTO_MAIN);
        g.link(arena, special_arena, ARENA_GOTO_SPECIAL_ARENA);

        g.link(outpost, main, GOTO_BACK);
        g.link(main, outpost, MAIN_GOTO_OUTPOST);

        g.link(commission, outpost, COMMISSION_GOTO_OUTPOST);
        g.link(outpost, commission, OUTPOST_GOTO_COMMISSION);

        g.link(mailbox, main, MAILBOX_GOTO_MAIN);
        g.link(main, mailbox, MAIN_GOTO_MAILBOX);

        g.link(recruit, main, TEAM_GOTO_MAIN);
        g.link(main, recruit, MAIN_GOTO_RECRUIT);

        g.link(ranking, ark, GOTO_BACK);
        g.link(ranking, main, GOTO_MAIN);
        g.link(ark, ranking, ARK_GOTO_RANKING);

        Self {
            graph: g,
            main,
            reward,
            destroy,
            friend,
            daily,
            shop,
            cash_shop,
            team,
            inventory,
            pass,
            conversation,
            ark,
            tribe_tower,
            interception,
            special_interception,
            simulation_room,
            arena,
            rookie_arena,
            special_arena,
            outpost,
            commission,
            mailbox,
            recruit,
            ranking,
        }
    }
}

/// Shared standard map, built on first use
pub static PAGES: Lazy<Pages> = Lazy::new(Pages::standard);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::NavigateError;

    #[test]
    fn test_main_to_arena_is_two_hops() {
        let p = Pages::standard();
        let route = p.graph.route(p.main, p.arena).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route[0].trigger.name(), "MAIN_GOTO_ARK");
        assert_eq!(route[1].trigger.name(), "ARK_GOTO_ARENA");
    }

    #[test]
    fn test_deep_screen_returns_home_directly() {
        let p = Pages::standard();
        let route = p.graph.route(p.special_arena, p.main).unwrap();
        assert_eq!(route.len(), 1);
        assert_eq!(route[0].trigger.name(), "GOTO_MAIN");
    }

    #[test]
    fn test_destroy_reached_through_reward() {
        let p = Pages::standard();
        let route = p.graph.route(p.main, p.destroy).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route[1].trigger.name(), "REWARD_GOTO_DESTROY");
    }

    #[test]
    fn test_special_interception_has_no_inbound_route() {
        let p = Pages::standard();
        match p.graph.route(p.main, p.special_interception) {
            Err(NavigateError::NoRoute { to, .. }) => assert_eq!(to, "special_interception"),
            other => panic!("expected NoRoute, got {other:?}"),
        }
        // The way out still works
        let out = p.graph.route(p.special_interception, p.ark).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_every_page_reaches_main() {
        let p = Pages::standard();
        for (id, page) in p.graph.pages() {
            if id == p.main {
                continue;
            }
            assert!(
                p.graph.route(id, p.main).is_ok(),
                "{} cannot reach main",
                page.name
            );
        }
    }

    #[test]
    fn test_shared_pages_instance() {
        assert_eq!(PAGES.graph.len(), 24);
        assert_eq!(PAGES.graph.get(PAGES.main).name, "main");
    }
}
