use serde::Serialize;

use crate::types::{ChapterId, DetailState};

/// State handed to the chapter reader.
///
/// `comic_detail_state` is the state this view was entered with, so the
/// reader can send the user back without rebuilding the link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadComicState {
    pub chapter_link: String,
    pub comic_title: String,
    pub chapter_number: ChapterId,
    pub comic_detail_state: DetailState,
}

/// Outbound navigation request.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    Home,
    ReadComic {
        route_id: String,
        chapter: ChapterId,
        state: ReadComicState,
    },
}

/// What gets printed for the router: `{"path": ..., "state": ...}`.
#[derive(Debug, Serialize)]
pub struct HandOff<'a> {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<&'a ReadComicState>,
}

impl Navigation {
    pub fn path(&self) -> String {
        match self {
            Navigation::Home => "/".to_string(),
            Navigation::ReadComic {
                route_id, chapter, ..
            } => format!("/read-comic/{}/chapter-{}", route_id, chapter),
        }
    }

    pub fn hand_off(&self) -> HandOff<'_> {
        HandOff {
            path: self.path(),
            state: match self {
                Navigation::Home => None,
                Navigation::ReadComic { state, .. } => Some(state),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComicSummary;

    fn read_nav(route_id: &str, chapter: &str) -> Navigation {
        Navigation::ReadComic {
            route_id: route_id.to_string(),
            chapter: chapter.into(),
            state: ReadComicState {
                chapter_link: "/ch/1".to_string(),
                comic_title: "Solo Leveling".to_string(),
                chapter_number: chapter.into(),
                comic_detail_state: DetailState {
                    comic: Some(ComicSummary {
                        title: "Solo Leveling".to_string(),
                        image: "cover.jpg".to_string(),
                        chapter: "200".into(),
                        extra: Default::default(),
                    }),
                    processed_link: Some("/komik/solo-leveling".to_string()),
                },
            },
        }
    }

    #[test]
    fn home_path() {
        assert_eq!(Navigation::Home.path(), "/");
        let json = serde_json::to_value(Navigation::Home.hand_off()).unwrap();
        assert_eq!(json, serde_json::json!({ "path": "/" }));
    }

    #[test]
    fn read_comic_path() {
        assert_eq!(
            read_nav("solo-leveling", "12").path(),
            "/read-comic/solo-leveling/chapter-12"
        );
    }

    #[test]
    fn read_comic_path_keeps_segments_as_given() {
        assert_eq!(
            read_nav("a b", "1/2").path(),
            "/read-comic/a b/chapter-1/2"
        );
    }

    #[test]
    fn hand_off_carries_state_in_camel_case() {
        let nav = read_nav("solo-leveling", "1");
        let json = serde_json::to_value(nav.hand_off()).unwrap();
        assert_eq!(json["path"], "/read-comic/solo-leveling/chapter-1");
        assert_eq!(json["state"]["chapterLink"], "/ch/1");
        assert_eq!(json["state"]["comicTitle"], "Solo Leveling");
        assert_eq!(json["state"]["chapterNumber"], "1");
        assert_eq!(
            json["state"]["comicDetailState"]["processedLink"],
            "/komik/solo-leveling"
        );
        assert_eq!(
            json["state"]["comicDetailState"]["comic"]["title"],
            "Solo Leveling"
        );
    }
}
