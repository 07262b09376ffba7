//! Turns the structured generation forms into the single instruction the
//! gateway's `/process` endpoint understands. Every modifier that has a
//! default is always spelled out; the rest are appended only when set.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_AUDIO_DURATION: u32 = 30;
pub const DEFAULT_VIDEO_DURATION: u32 = 10;

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownChoice {
    pub name: &'static str,
    pub value: String,
    pub valid: &'static [&'static str],
}

impl fmt::Display for UnknownChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} {:?}, expected one of: {}", self.name, self.value, self.valid.join(", "))
    }
}

macro_rules! choices {
    ($name:ident ($label:literal) { $($variant:ident => $value:literal),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                $(if value.eq_ignore_ascii_case($value) {
                    return Ok(Self::$variant);
                })+

                Err(UnknownChoice { name: $label, value: value.into(), valid: Self::VALUES })
            }
        }
    };
}

choices!(GameType ("game type") {
    Rpg => "rpg",
    Puzzle => "puzzle",
    Action => "action",
    Strategy => "strategy",
    Adventure => "adventure",
    Casual => "casual",
});

choices!(Difficulty ("difficulty") {
    Easy => "easy",
    Medium => "medium",
    Hard => "hard",
});

choices!(ImageStyle ("image style") {
    Realistic => "realistic",
    Artistic => "artistic",
    Cartoon => "cartoon",
    Abstract => "abstract",
    Vintage => "vintage",
    Futuristic => "futuristic",
});

choices!(ImageSize ("image size") {
    Small => "512x512",
    Large => "1024x1024",
    Landscape => "1024x768",
    Portrait => "768x1024",
});

choices!(Quality ("quality") {
    Standard => "standard",
    High => "high",
});

choices!(AudioKind ("audio type") {
    Music => "music",
    Speech => "speech",
    Effects => "effects",
});

choices!(MusicStyle ("music style") {
    Ambient => "ambient",
    Electronic => "electronic",
    Orchestral => "orchestral",
    Rock => "rock",
    Jazz => "jazz",
    Cinematic => "cinematic",
});

choices!(VideoStyle ("video style") {
    Realistic => "realistic",
    Animated => "animated",
    Cinematic => "cinematic",
    Abstract => "abstract",
    Vintage => "vintage",
    Futuristic => "futuristic",
});

choices!(AspectRatio ("aspect ratio") {
    Widescreen => "16:9",
    Vertical => "9:16",
    Square => "1:1",
    Classic => "4:3",
});

#[derive(Clone, Debug, Default)]
pub struct GameRequest {
    pub description: String,
    pub game_type: Option<GameType>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Clone, Debug, Default)]
pub struct ImageRequest {
    pub description: String,
    pub style: Option<ImageStyle>,
    pub size: Option<ImageSize>,
    pub quality: Option<Quality>,
}

#[derive(Clone, Debug, Default)]
pub struct AudioRequest {
    pub description: String,
    pub kind: Option<AudioKind>,
    pub style: Option<MusicStyle>,
    pub duration: Option<u32>,
}

#[derive(Clone, Debug, Default)]
pub struct VideoRequest {
    pub description: String,
    pub style: Option<VideoStyle>,
    pub duration: Option<u32>,
    pub aspect: Option<AspectRatio>,
}

pub fn game(request: &GameRequest) -> String {
    format!(
        "Create a {} difficulty {} game: {}",
        request.difficulty.unwrap_or(Difficulty::Medium),
        request.game_type.unwrap_or(GameType::Rpg),
        request.description
    )
}

pub fn image(request: &ImageRequest) -> String {
    let mut prompt = format!(
        "Generate a high-quality {}-style image of {}",
        request.style.unwrap_or(ImageStyle::Realistic),
        request.description
    );

    if let Some(size) = request.size {
        prompt.push_str(&format!(" at {size} resolution"));
    }
    if let Some(quality) = request.quality {
        prompt.push_str(&format!(", {quality} quality"));
    }

    prompt
}

pub fn audio(request: &AudioRequest) -> String {
    let duration = request.duration.unwrap_or(DEFAULT_AUDIO_DURATION);

    match request.kind.unwrap_or(AudioKind::Music) {
        AudioKind::Music => format!(
            "Generate {duration} seconds of {} music: {}",
            request.style.unwrap_or(MusicStyle::Ambient),
            request.description
        ),
        AudioKind::Speech => speech(&request.description),
        AudioKind::Effects => {
            format!("Generate a {duration}-second sound effect of {}", request.description)
        }
    }
}

pub fn speech(text: &str) -> String {
    format!("Convert the following text to natural-sounding speech: {text}")
}

pub fn video(request: &VideoRequest) -> String {
    let mut prompt = format!(
        "Generate a {}-second {}-style video of {}",
        request.duration.unwrap_or(DEFAULT_VIDEO_DURATION),
        request.style.unwrap_or(VideoStyle::Realistic),
        request.description
    );

    if let Some(aspect) = request.aspect {
        prompt.push_str(&format!(" in {aspect} aspect ratio"));
    }

    prompt
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_image_prompt() {
        let request = ImageRequest { description: "a red apple".into(), ..Default::default() };
        assert_eq!(image(&request), "Generate a high-quality realistic-style image of a red apple");

        let request = ImageRequest {
            description: "a red apple".into(),
            style: Some(ImageStyle::Cartoon),
            size: Some(ImageSize::Portrait),
            quality: Some(Quality::High),
        };
        assert_eq!(
            image(&request),
            "Generate a high-quality cartoon-style image of a red apple at 768x1024 resolution, \
             high quality"
        );
    }

    #[test]
    fn test_game_prompt() {
        let request = GameRequest { description: "a ninja cat platformer".into(), ..Default::default() };
        assert_eq!(game(&request), "Create a medium difficulty rpg game: a ninja cat platformer");

        let request = GameRequest {
            description: "a ninja cat platformer".into(),
            game_type: Some(GameType::Action),
            difficulty: Some(Difficulty::Hard),
        };
        assert_eq!(game(&request), "Create a hard difficulty action game: a ninja cat platformer");
    }

    #[test]
    fn test_audio_prompt() {
        let request = AudioRequest { description: "rain on a tin roof".into(), ..Default::default() };
        assert_eq!(audio(&request), "Generate 30 seconds of ambient music: rain on a tin roof");

        let request = AudioRequest {
            description: "a door creaking".into(),
            kind: Some(AudioKind::Effects),
            duration: Some(5),
            ..Default::default()
        };
        assert_eq!(audio(&request), "Generate a 5-second sound effect of a door creaking");

        let request = AudioRequest {
            description: "Welcome to our platform".into(),
            kind: Some(AudioKind::Speech),
            style: Some(MusicStyle::Jazz),
            duration: Some(120),
        };
        assert_eq!(
            audio(&request),
            "Convert the following text to natural-sounding speech: Welcome to our platform"
        );
    }

    #[test]
    fn test_video_prompt() {
        let request = VideoRequest { description: "waves at dusk".into(), ..Default::default() };
        assert_eq!(video(&request), "Generate a 10-second realistic-style video of waves at dusk");

        let request = VideoRequest {
            description: "waves at dusk".into(),
            style: Some(VideoStyle::Vintage),
            duration: Some(3),
            aspect: Some(AspectRatio::Vertical),
        };
        assert_eq!(
            video(&request),
            "Generate a 3-second vintage-style video of waves at dusk in 9:16 aspect ratio"
        );
    }

    #[test]
    fn test_description_is_kept_verbatim() {
        let description = "  a \"quoted\" castle, at: dusk!  ";

        assert!(game(&GameRequest { description: description.into(), ..Default::default() })
            .contains(description));
        assert!(image(&ImageRequest { description: description.into(), ..Default::default() })
            .contains(description));
        assert!(audio(&AudioRequest { description: description.into(), ..Default::default() })
            .contains(description));
        assert!(video(&VideoRequest { description: description.into(), ..Default::default() })
            .contains(description));
        assert!(speech(description).contains(description));
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!("Cinematic".parse::<VideoStyle>(), Ok(VideoStyle::Cinematic));
        assert_eq!("16:9".parse::<AspectRatio>(), Ok(AspectRatio::Widescreen));
        assert_eq!(
            "huge".parse::<ImageSize>(),
            Err(UnknownChoice {
                name: "image size",
                value: "huge".into(),
                valid: ImageSize::VALUES,
            })
        );
        assert_eq!(
            "x".parse::<Difficulty>().unwrap_err().to_string(),
            "unknown difficulty \"x\", expected one of: easy, medium, hard"
        );
    }
}
