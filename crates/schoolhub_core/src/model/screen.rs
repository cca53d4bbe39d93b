//! Screen sets mounted by the presentation layer.
//!
//! `screen_set_for` is the single selection site: every role maps to exactly
//! one set and the absence of a role maps to the login screen.

use crate::model::identity::Role;
use std::fmt::{Display, Formatter};

/// Individual screen identifiers shared with the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    AdminDashboard,
    StudentRoster,
    TeacherDirectory,
    ReportArchive,
    TeacherDashboard,
    VoiceNotes,
    ReportComposer,
    ParentDashboard,
    ChildReports,
    Profile,
}

impl Screen {
    /// Stable route name used by the UI router.
    pub fn route(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::AdminDashboard => "admin_dashboard",
            Self::StudentRoster => "student_roster",
            Self::TeacherDirectory => "teacher_directory",
            Self::ReportArchive => "report_archive",
            Self::TeacherDashboard => "teacher_dashboard",
            Self::VoiceNotes => "voice_notes",
            Self::ReportComposer => "report_composer",
            Self::ParentDashboard => "parent_dashboard",
            Self::ChildReports => "child_reports",
            Self::Profile => "profile",
        }
    }
}

/// Group of screens mounted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenSet {
    Login,
    Admin,
    Teacher,
    Parent,
}

const LOGIN_SCREENS: &[Screen] = &[Screen::Login];
const ADMIN_SCREENS: &[Screen] = &[
    Screen::AdminDashboard,
    Screen::StudentRoster,
    Screen::TeacherDirectory,
    Screen::ReportArchive,
    Screen::Profile,
];
const TEACHER_SCREENS: &[Screen] = &[
    Screen::TeacherDashboard,
    Screen::StudentRoster,
    Screen::VoiceNotes,
    Screen::ReportComposer,
    Screen::Profile,
];
const PARENT_SCREENS: &[Screen] = &[
    Screen::ParentDashboard,
    Screen::ChildReports,
    Screen::Profile,
];

impl ScreenSet {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Parent => "parent",
        }
    }

    /// Screens of this set in tab order.
    pub fn screens(self) -> &'static [Screen] {
        match self {
            Self::Login => LOGIN_SCREENS,
            Self::Admin => ADMIN_SCREENS,
            Self::Teacher => TEACHER_SCREENS,
            Self::Parent => PARENT_SCREENS,
        }
    }

    /// First screen shown when the set is mounted.
    pub fn initial_screen(self) -> Screen {
        self.screens()[0]
    }
}

impl Display for ScreenSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selects the screen set for the current role.
pub fn screen_set_for(role: Option<Role>) -> ScreenSet {
    match role {
        Some(Role::Admin) => ScreenSet::Admin,
        Some(Role::Teacher) => ScreenSet::Teacher,
        Some(Role::Parent) => ScreenSet::Parent,
        None => ScreenSet::Login,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_maps_to_its_own_set() {
        assert_eq!(screen_set_for(Some(Role::Admin)), ScreenSet::Admin);
        assert_eq!(screen_set_for(Some(Role::Teacher)), ScreenSet::Teacher);
        assert_eq!(screen_set_for(Some(Role::Parent)), ScreenSet::Parent);
        assert_eq!(screen_set_for(None), ScreenSet::Login);
    }

    #[test]
    fn sets_are_non_empty_and_login_is_exclusive() {
        for role in Role::ALL {
            let set = screen_set_for(Some(role));
            assert!(!set.screens().is_empty());
            assert!(!set.screens().contains(&Screen::Login));
            assert_eq!(set.as_str(), role.as_str());
        }
        assert_eq!(ScreenSet::Login.screens(), &[Screen::Login]);
    }

    #[test]
    fn only_teachers_get_report_composer() {
        assert_eq!(ScreenSet::Teacher.initial_screen(), Screen::TeacherDashboard);
        assert!(ScreenSet::Teacher.screens().contains(&Screen::ReportComposer));
        assert!(!ScreenSet::Admin.screens().contains(&Screen::ReportComposer));
        assert!(!ScreenSet::Parent.screens().contains(&Screen::ReportComposer));
    }
}
