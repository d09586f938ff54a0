//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{
    AppState, CITY_NOT_FOUND_MESSAGE, LOADING_ANIM_CYCLE_TICKS, LOCATION_FETCH_FAILED_MESSAGE,
    LookupKind,
};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Search actions =====
        Action::SearchOpen => {
            state.search_mode = true;
            DispatchResult::changed()
        }

        Action::SearchClose => {
            state.search_mode = false;
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            state.query = query;
            state.error = None;
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            let was_open = std::mem::replace(&mut state.search_mode, false);
            let city = state.query.trim().to_string();
            if city.is_empty() || state.is_loading() {
                return if was_open {
                    DispatchResult::changed()
                } else {
                    DispatchResult::unchanged()
                };
            }
            state.query = city.clone();
            lookup_by_name(state, city)
        }

        Action::SearchCity(city) => {
            let city = city.trim().to_string();
            if city.is_empty() || state.is_loading() {
                return DispatchResult::unchanged();
            }
            state.query = city.clone();
            lookup_by_name(state, city)
        }

        Action::SearchClear => {
            state.query.clear();
            state.weather = None;
            state.error = None;
            // A refresh has nothing left to replace. Foreground lookups still land.
            if matches!(&state.pending, Some(p) if !p.kind.is_foreground()) {
                state.pending = None;
            }
            DispatchResult::changed()
        }

        // ===== Recent actions =====
        Action::RecentHighlight(index) => {
            if index < state.recent.len() && index != state.recent_selected {
                state.recent_selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::RecentOpen(city) => {
            if city.trim().is_empty() {
                return DispatchResult::unchanged();
            }
            state.search_mode = false;
            state.query = city.clone();
            lookup_by_name(state, city)
        }

        Action::RecentDidSave => {
            if state.storage_error.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::RecentDidError(msg) => {
            state.storage_error = Some(msg);
            DispatchResult::changed()
        }

        // ===== Location actions =====
        Action::LocationRequest => {
            if state.is_loading() {
                return DispatchResult::unchanged();
            }
            state.error = None;
            reset_loading_anim(state);
            let seq = state.begin_lookup(LookupKind::Locating);
            DispatchResult::changed_with(Effect::Locate { seq })
        }

        Action::LocationDidResolve { seq, lat, lon } => {
            if !awaiting_location(state, seq) {
                return DispatchResult::unchanged();
            }
            issue_fetch(state, LookupKind::Coordinates { lat, lon })
        }

        Action::LocationDidError { seq, failure } => {
            if !awaiting_location(state, seq) {
                return DispatchResult::unchanged();
            }
            state.pending = None;
            state.error = Some(failure.message().to_string());
            finish_loading_anim(state);
            refresh_if_unit_changed(state)
        }

        // ===== Weather actions =====
        Action::WeatherDidLoad { seq, result } => {
            let Some(kind) = state.settle(seq) else {
                return DispatchResult::unchanged();
            };
            match kind {
                LookupKind::Name(city) => {
                    state.weather = Some(result);
                    finish_loading_anim(state);
                    DispatchResult::changed_with(remember_city(state, &city))
                }
                LookupKind::Coordinates { .. } => {
                    let city = result.city.clone();
                    state.query = city.clone();
                    state.weather = Some(result);
                    finish_loading_anim(state);
                    DispatchResult::changed_with(remember_city(state, &city))
                }
                LookupKind::Refresh(_) => {
                    state.weather = Some(result);
                    DispatchResult::changed()
                }
                LookupKind::Locating => DispatchResult::unchanged(),
            }
        }

        Action::WeatherDidError { seq, error: _ } => {
            let Some(kind) = state.settle(seq) else {
                return DispatchResult::unchanged();
            };
            match kind {
                LookupKind::Name(_) => {
                    state.weather = None;
                    state.error = Some(CITY_NOT_FOUND_MESSAGE.to_string());
                    finish_loading_anim(state);
                    DispatchResult::changed()
                }
                LookupKind::Coordinates { .. } => {
                    state.error = Some(LOCATION_FETCH_FAILED_MESSAGE.to_string());
                    finish_loading_anim(state);
                    refresh_if_unit_changed(state)
                }
                // Refresh failures keep the previous result on screen.
                LookupKind::Refresh(_) | LookupKind::Locating => DispatchResult::unchanged(),
            }
        }

        // ===== UI actions =====
        Action::UiToggleUnits => {
            state.unit = state.unit.toggle();
            let pending = state.pending.as_ref().map(|p| p.kind.clone());
            match pending {
                // Restart the in-flight lookup so its result arrives in the new unit.
                Some(kind @ (LookupKind::Name(_) | LookupKind::Coordinates { .. })) => {
                    issue_fetch(state, kind)
                }
                // The fetch after resolution uses the new unit. If locating fails,
                // the kept result is refreshed then.
                Some(LookupKind::Locating) => DispatchResult::changed(),
                Some(LookupKind::Refresh(_)) | None => {
                    match state.weather.as_ref().map(|w| w.city.clone()) {
                        Some(city) => issue_fetch(state, LookupKind::Refresh(city)),
                        None => DispatchResult::changed(),
                    }
                }
            }
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            let animating = state.loading_anim_active();
            if animating {
                state.tick_count = state.tick_count.wrapping_add(1);
                if state.loading_anim_ticks_remaining > 0 {
                    state.loading_anim_ticks_remaining -= 1;
                }
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn lookup_by_name(state: &mut AppState, city: String) -> DispatchResult<Effect> {
    state.error = None;
    reset_loading_anim(state);
    issue_fetch(state, LookupKind::Name(city))
}

/// Start awaiting `kind` and emit its fetch in the current unit.
fn issue_fetch(state: &mut AppState, kind: LookupKind) -> DispatchResult<Effect> {
    let Some(target) = kind.target() else {
        return DispatchResult::unchanged();
    };
    let seq = state.begin_lookup(kind);
    DispatchResult::changed_with(Effect::FetchWeather {
        seq,
        target,
        unit: state.unit,
    })
}

/// After a failed location lookup, bring a kept result in line with a unit
/// toggled while the lookup was in flight.
fn refresh_if_unit_changed(state: &mut AppState) -> DispatchResult<Effect> {
    let stale_city = state
        .weather
        .as_ref()
        .filter(|w| w.unit != state.unit)
        .map(|w| w.city.clone());
    match stale_city {
        Some(city) => issue_fetch(state, LookupKind::Refresh(city)),
        None => DispatchResult::changed(),
    }
}

fn awaiting_location(state: &AppState, seq: u64) -> bool {
    matches!(
        &state.pending,
        Some(pending) if pending.seq == seq && pending.kind == LookupKind::Locating
    )
}

fn remember_city(state: &mut AppState, city: &str) -> Effect {
    state.recent.push(city);
    state.recent_selected = 0;
    Effect::SaveRecent {
        cities: state.recent.to_vec(),
    }
}

fn reset_loading_anim(state: &mut AppState) {
    state.tick_count = 0;
    state.loading_anim_ticks_remaining = 0;
}

fn finish_loading_anim(state: &mut AppState) {
    state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
}

fn ticks_to_phase_zero(tick_count: u32) -> u32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    if tick_count == 0 {
        return cycle;
    }
    let remainder = tick_count % cycle;
    if remainder == 0 { 0 } else { cycle - remainder }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{LocationFailure, LookupTarget, RecentSearches, Unit, WeatherResult};
    use pretty_assertions::assert_eq;

    fn paris(unit: Unit) -> WeatherResult {
        WeatherResult {
            city: "Paris".into(),
            country: "FR".into(),
            temperature: 18.4,
            feels_like: 17.9,
            condition: "Clouds".into(),
            description: "broken clouds".into(),
            condition_id: 803,
            humidity: 62,
            wind_speed: 4.1,
            pressure: 1012,
            visibility: Some(10000),
            unit,
        }
    }

    fn fetch_seq(effect: &Effect) -> u64 {
        match effect {
            Effect::FetchWeather { seq, .. } => *seq,
            other => panic!("expected FetchWeather, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_sets_loading_and_emits_fetch() {
        let mut state = AppState {
            query: "  Paris ".into(),
            error: Some("old".into()),
            tick_count: 5,
            loading_anim_ticks_remaining: 7,
            ..Default::default()
        };

        let result = reducer(&mut state, Action::SearchSubmit);

        assert!(result.changed);
        assert!(state.is_loading());
        assert_eq!(state.query, "Paris");
        assert_eq!(state.error, None);
        assert_eq!(state.tick_count, 0);
        assert_eq!(state.loading_anim_ticks_remaining, 0);
        assert_eq!(result.effects.len(), 1);
        assert!(matches!(
            &result.effects[0],
            Effect::FetchWeather { target: LookupTarget::City(city), unit: Unit::Metric, .. }
                if city == "Paris"
        ));
    }

    #[test]
    fn test_empty_submit_is_noop() {
        let mut state = AppState {
            query: "   ".into(),
            ..Default::default()
        };
        let before = state.clone();

        let result = reducer(&mut state, Action::SearchSubmit);

        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.query, before.query);
        assert_eq!(state.pending, None);
        assert_eq!(state.next_seq, before.next_seq);
    }

    #[test]
    fn test_submit_ignored_while_loading() {
        let mut state = AppState {
            query: "Paris".into(),
            ..Default::default()
        };
        reducer(&mut state, Action::SearchSubmit);
        state.query = "Oslo".into();

        let result = reducer(&mut state, Action::SearchSubmit);

        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_name_success_updates_result_and_recent() {
        let mut state = AppState {
            recent: RecentSearches::from_saved(vec!["B".into(), "A".into()]),
            ..Default::default()
        };
        let result = reducer(&mut state, Action::SearchCity("A".into()));
        let seq = fetch_seq(&result.effects[0]);

        let mut data = paris(Unit::Metric);
        data.city = "A".into();
        let result = reducer(&mut state, Action::WeatherDidLoad { seq, result: data });

        assert!(result.changed);
        assert!(!state.is_loading());
        assert_eq!(state.recent.as_slice(), ["A", "B"]);
        assert_eq!(
            result.effects,
            vec![Effect::SaveRecent {
                cities: vec!["A".into(), "B".into()]
            }]
        );
        assert_eq!(
            state.loading_anim_ticks_remaining,
            LOADING_ANIM_CYCLE_TICKS
        );
    }

    #[test]
    fn test_name_failure_clears_result() {
        let mut state = AppState {
            weather: Some(paris(Unit::Metric)),
            ..Default::default()
        };
        let result = reducer(&mut state, Action::SearchCity("Atlantis".into()));
        let seq = fetch_seq(&result.effects[0]);

        reducer(
            &mut state,
            Action::WeatherDidError {
                seq,
                error: "404 Not Found".into(),
            },
        );

        assert_eq!(state.weather, None);
        assert_eq!(state.error.as_deref(), Some(CITY_NOT_FOUND_MESSAGE));
        assert!(!state.is_loading());
        assert!(state.recent.is_empty());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut state = AppState::default();
        let first = reducer(&mut state, Action::SearchCity("Paris".into()));
        let first_seq = fetch_seq(&first.effects[0]);
        let second = reducer(&mut state, Action::RecentOpen("Oslo".into()));
        let second_seq = fetch_seq(&second.effects[0]);

        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                seq: first_seq,
                result: paris(Unit::Metric),
            },
        );

        assert!(!result.changed);
        assert_eq!(state.weather, None);
        assert!(state.is_loading());
        assert_eq!(
            state.pending.as_ref().map(|p| p.seq),
            Some(second_seq)
        );
    }

    #[test]
    fn test_toggle_refreshes_existing_result() {
        let mut state = AppState {
            weather: Some(paris(Unit::Metric)),
            recent: RecentSearches::from_saved(vec!["Paris".into()]),
            ..Default::default()
        };

        let result = reducer(&mut state, Action::UiToggleUnits);

        assert_eq!(state.unit, Unit::Imperial);
        assert!(!state.is_loading());
        assert!(matches!(
            &result.effects[..],
            [Effect::FetchWeather { target: LookupTarget::City(city), unit: Unit::Imperial, .. }]
                if city == "Paris"
        ));

        let seq = fetch_seq(&result.effects[0]);
        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                seq,
                result: paris(Unit::Imperial),
            },
        );
        assert!(result.effects.is_empty());
        assert_eq!(state.weather.as_ref().map(|w| w.unit), Some(Unit::Imperial));
        assert_eq!(state.recent.as_slice(), ["Paris"]);
    }

    #[test]
    fn test_refresh_failure_keeps_result() {
        let mut state = AppState {
            weather: Some(paris(Unit::Metric)),
            ..Default::default()
        };
        let result = reducer(&mut state, Action::UiToggleUnits);
        let seq = fetch_seq(&result.effects[0]);

        let result = reducer(
            &mut state,
            Action::WeatherDidError {
                seq,
                error: "timeout".into(),
            },
        );

        assert!(!result.changed);
        assert_eq!(state.weather, Some(paris(Unit::Metric)));
        assert_eq!(state.error, None);
        assert_eq!(state.pending, None);
    }

    #[test]
    fn test_toggle_without_result_only_flips_unit() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::UiToggleUnits);
        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.unit, Unit::Imperial);
    }

    #[test]
    fn test_toggle_during_lookup_restarts_it() {
        let mut state = AppState::default();
        let first = reducer(&mut state, Action::SearchCity("Oslo".into()));
        let first_seq = fetch_seq(&first.effects[0]);

        let result = reducer(&mut state, Action::UiToggleUnits);

        assert!(state.is_loading());
        assert!(matches!(
            &result.effects[..],
            [Effect::FetchWeather { target: LookupTarget::City(city), unit: Unit::Imperial, seq }]
                if city == "Oslo" && *seq != first_seq
        ));
    }

    #[test]
    fn test_location_flow_sets_query_from_result() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::LocationRequest);
        assert!(state.is_loading());
        let Effect::Locate { seq } = result.effects[0] else {
            panic!("expected Locate");
        };

        let result = reducer(
            &mut state,
            Action::LocationDidResolve {
                seq,
                lat: 48.85,
                lon: 2.35,
            },
        );
        assert!(matches!(
            &result.effects[..],
            [Effect::FetchWeather { target: LookupTarget::Coordinates { .. }, .. }]
        ));
        let seq = fetch_seq(&result.effects[0]);

        reducer(
            &mut state,
            Action::WeatherDidLoad {
                seq,
                result: paris(Unit::Metric),
            },
        );

        assert_eq!(state.query, "Paris");
        assert_eq!(state.recent.as_slice(), ["Paris"]);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_location_denied_keeps_result() {
        let mut state = AppState {
            weather: Some(paris(Unit::Metric)),
            ..Default::default()
        };
        let result = reducer(&mut state, Action::LocationRequest);
        let Effect::Locate { seq } = result.effects[0] else {
            panic!("expected Locate");
        };

        reducer(
            &mut state,
            Action::LocationDidError {
                seq,
                failure: LocationFailure::Denied,
            },
        );

        assert_eq!(state.weather, Some(paris(Unit::Metric)));
        assert_eq!(
            state.error.as_deref(),
            Some(LocationFailure::Denied.message())
        );
        assert!(!state.is_loading());
    }

    #[test]
    fn test_coordinates_failure_keeps_result() {
        let mut state = AppState {
            weather: Some(paris(Unit::Metric)),
            ..Default::default()
        };
        let result = reducer(&mut state, Action::LocationRequest);
        let Effect::Locate { seq } = result.effects[0] else {
            panic!("expected Locate");
        };
        let result = reducer(
            &mut state,
            Action::LocationDidResolve {
                seq,
                lat: 1.0,
                lon: 2.0,
            },
        );
        let seq = fetch_seq(&result.effects[0]);

        reducer(
            &mut state,
            Action::WeatherDidError {
                seq,
                error: "500".into(),
            },
        );

        assert_eq!(state.weather, Some(paris(Unit::Metric)));
        assert_eq!(state.error.as_deref(), Some(LOCATION_FETCH_FAILED_MESSAGE));
    }

    #[test]
    fn test_clear_keeps_unit_and_recent() {
        let mut state = AppState {
            query: "Paris".into(),
            weather: Some(paris(Unit::Imperial)),
            error: Some("boom".into()),
            unit: Unit::Imperial,
            recent: RecentSearches::from_saved(vec!["Paris".into()]),
            ..Default::default()
        };

        reducer(&mut state, Action::SearchClear);

        assert_eq!(state.query, "");
        assert_eq!(state.weather, None);
        assert_eq!(state.error, None);
        assert_eq!(state.unit, Unit::Imperial);
        assert_eq!(state.recent.as_slice(), ["Paris"]);
    }

    #[test]
    fn test_clear_drops_pending_refresh() {
        let mut state = AppState {
            query: "Paris".into(),
            weather: Some(paris(Unit::Metric)),
            ..Default::default()
        };
        let result = reducer(&mut state, Action::UiToggleUnits);
        let refresh_seq = fetch_seq(&result.effects[0]);

        reducer(&mut state, Action::SearchClear);
        assert_eq!(state.pending, None);

        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                seq: refresh_seq,
                result: paris(Unit::Imperial),
            },
        );
        assert!(!result.changed);
        assert_eq!(state.weather, None);

        // Toggling back with nothing on screen starts no fetch.
        let result = reducer(&mut state, Action::UiToggleUnits);
        assert!(result.effects.is_empty());
        assert_eq!(state.unit, Unit::Metric);
    }

    #[test]
    fn test_clear_keeps_foreground_lookup() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::SearchCity("Oslo".into()));
        let seq = fetch_seq(&result.effects[0]);

        reducer(&mut state, Action::SearchClear);
        assert!(state.is_loading());

        let mut oslo = paris(Unit::Metric);
        oslo.city = "Oslo".into();
        reducer(&mut state, Action::WeatherDidLoad { seq, result: oslo });
        assert_eq!(state.weather.as_ref().map(|w| w.city.as_str()), Some("Oslo"));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_toggle_while_locating_refreshes_after_denial() {
        let mut state = AppState {
            weather: Some(paris(Unit::Metric)),
            ..Default::default()
        };
        let result = reducer(&mut state, Action::LocationRequest);
        let Effect::Locate { seq } = result.effects[0] else {
            panic!("expected Locate");
        };
        let result = reducer(&mut state, Action::UiToggleUnits);
        assert!(result.effects.is_empty());

        let result = reducer(
            &mut state,
            Action::LocationDidError {
                seq,
                failure: LocationFailure::Denied,
            },
        );

        assert!(matches!(
            &result.effects[..],
            [Effect::FetchWeather { target: LookupTarget::City(city), unit: Unit::Imperial, .. }]
                if city == "Paris"
        ));
        assert!(!state.is_loading(), "refresh runs in the background");
        assert_eq!(
            state.error.as_deref(),
            Some(LocationFailure::Denied.message())
        );

        let seq = fetch_seq(&result.effects[0]);
        reducer(
            &mut state,
            Action::WeatherDidLoad {
                seq,
                result: paris(Unit::Imperial),
            },
        );
        assert_eq!(state.weather.as_ref().map(|w| w.unit), Some(state.unit));
    }

    #[test]
    fn test_toggle_while_locating_refreshes_after_fetch_failure() {
        let mut state = AppState {
            weather: Some(paris(Unit::Metric)),
            ..Default::default()
        };
        let result = reducer(&mut state, Action::LocationRequest);
        let Effect::Locate { seq } = result.effects[0] else {
            panic!("expected Locate");
        };
        reducer(&mut state, Action::UiToggleUnits);
        let result = reducer(
            &mut state,
            Action::LocationDidResolve {
                seq,
                lat: 1.0,
                lon: 2.0,
            },
        );
        let seq = fetch_seq(&result.effects[0]);

        let result = reducer(
            &mut state,
            Action::WeatherDidError {
                seq,
                error: "500".into(),
            },
        );

        assert!(matches!(
            &result.effects[..],
            [Effect::FetchWeather { target: LookupTarget::City(city), unit: Unit::Imperial, .. }]
                if city == "Paris"
        ));
        assert_eq!(state.error.as_deref(), Some(LOCATION_FETCH_FAILED_MESSAGE));
    }

    #[test]
    fn test_location_failure_without_toggle_starts_no_fetch() {
        let mut state = AppState {
            weather: Some(paris(Unit::Metric)),
            ..Default::default()
        };
        let result = reducer(&mut state, Action::LocationRequest);
        let Effect::Locate { seq } = result.effects[0] else {
            panic!("expected Locate");
        };

        let result = reducer(
            &mut state,
            Action::LocationDidError {
                seq,
                failure: LocationFailure::Unavailable,
            },
        );

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.pending, None);
    }

    #[test]
    fn test_typing_clears_error() {
        let mut state = AppState {
            error: Some(CITY_NOT_FOUND_MESSAGE.into()),
            ..Default::default()
        };
        reducer(&mut state, Action::SearchQueryChange("Lo".into()));
        assert_eq!(state.query, "Lo");
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_tick_rerenders_during_loading_animation() {
        let mut state = AppState::default();

        // Not loading and no remaining animation - no re-render
        let result = reducer(&mut state, Action::Tick);
        assert!(!result.changed);

        // Remaining animation ticks - should re-render
        state.loading_anim_ticks_remaining = 1;
        let result = reducer(&mut state, Action::Tick);
        assert!(result.changed);
        assert_eq!(state.loading_anim_ticks_remaining, 0);

        // Loading - should re-render even without remaining ticks
        reducer(&mut state, Action::SearchCity("Paris".into()));
        let result = reducer(&mut state, Action::Tick);
        assert!(result.changed);
    }
}
