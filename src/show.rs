use crate::client::CompletionBackend;
use crate::config::ShowConfig;
use crate::error::BotError;
use crate::models::PromptPair;
use rand::seq::SliceRandom;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Interactive stand-up show: intro phrase, operator country/language,
/// optional comedian persona, one main joke, parting line.
///
/// Reader and writer are injected so the console flow can run against
/// buffers in tests.
pub struct StandUpShow {
    backend: Arc<dyn CompletionBackend>,
    config: ShowConfig,
}

impl StandUpShow {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: ShowConfig) -> Self {
        Self { backend, config }
    }

    /// Run the whole show and return the main joke for rating.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
    ) -> Result<String, BotError> {
        let intro = self
            .complete(
                "Tell me a unique and funny introductory phrase for a stand up comedy show."
                    .to_string(),
            )
            .await?;
        self.announce(out, &intro)?;

        let country = self.ask(input, out, "Where are you from?")?;
        let joke = self
            .complete(build_prompt(country.as_deref(), None))
            .await?;
        self.announce(out, &joke)?;

        let language = self.ask(
            input,
            out,
            "I am really an educated bot, would you like me to entertain you in another language? \
             If so, tell me which one",
        )?;
        let joke = self
            .complete(build_prompt(country.as_deref(), language.as_deref()))
            .await?;
        self.announce(out, &joke)?;

        let persona = self.pick_comedian(input, out, language.as_deref()).await?;

        let mut main_request = build_prompt(country.as_deref(), language.as_deref());
        if let Some(comedian) = &persona {
            main_request.push_str(&format!(" in the style of {comedian}"));
        }
        let main_joke = self.complete(main_request).await?;
        self.announce(out, &main_joke)?;

        let mut outro_request =
            String::from("Tell me a unique and funny parting line for a stand up comedy show");
        if let Some(lang) = language.as_deref() {
            outro_request.push_str(&format!(" in {lang}"));
        }
        let outro = self.complete(outro_request).await?;
        self.announce(out, &outro)?;

        Ok(main_joke)
    }

    /// Offer three random comedians plus a "be yourself" option. A
    /// non-integer or out-of-range answer silently means no persona.
    async fn pick_comedian<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
        language: Option<&str>,
    ) -> Result<Option<String>, BotError> {
        let offered: Vec<String> = self
            .config
            .comedians
            .choose_multiple(&mut rand::thread_rng(), 3)
            .cloned()
            .collect();
        if offered.is_empty() {
            return Ok(None);
        }

        let header = self
            .localize(
                "I can be like one of your favorite comedians. Choose one of them by number:",
                language,
            )
            .await?;
        self.announce(out, &header)?;
        for (index, comedian) in offered.iter().enumerate() {
            writeln!(out, "{}: {}", index + 1, comedian)?;
        }
        let stay_yourself = self.localize("Just be as you are", language).await?;
        writeln!(out, "{}: {}", offered.len() + 1, stay_yourself)?;

        let choice = read_line(input)?;
        match parse_menu_choice(&choice, &offered) {
            Some(comedian) => {
                tracing::debug!(comedian = %comedian, "persona chosen");
                Ok(Some(comedian))
            }
            None => {
                let line = self
                    .localize("No problem, I will simply be myself.", language)
                    .await?;
                self.announce(out, &line)?;
                Ok(None)
            }
        }
    }

    /// Translate operator-facing phrases when a non-English language was
    /// chosen; English and no-language shows pass phrases through unchanged.
    async fn localize(&self, text: &str, language: Option<&str>) -> Result<String, BotError> {
        match language {
            Some(lang) if !lang.eq_ignore_ascii_case("english") => {
                self.complete(format!("Translate this phrase into {lang}:\n{text}"))
                    .await
            }
            _ => Ok(text.to_string()),
        }
    }

    async fn complete(&self, user: String) -> Result<String, BotError> {
        let prompt = PromptPair::new(self.stage_prompt(), user);
        self.backend.complete(&prompt).await
    }

    fn stage_prompt(&self) -> String {
        format!(
            "Your name is {}. You are hosting a stand up comedy show.",
            self.config.name
        )
    }

    fn ask<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
        question: &str,
    ) -> Result<Option<String>, BotError> {
        self.announce(out, question)?;
        let line = read_line(input)?;
        let answer = line.trim();
        Ok(if answer.is_empty() {
            None
        } else {
            Some(answer.to_string())
        })
    }

    fn announce<W: Write>(&self, out: &mut W, text: &str) -> Result<(), BotError> {
        writeln!(out, "{}: {}", self.config.name, text)?;
        Ok(())
    }
}

/// Compose the joke request from the optional country and language.
pub fn build_prompt(country: Option<&str>, language: Option<&str>) -> String {
    let mut prompt = String::from("Tell me a joke");
    if let Some(country) = country {
        prompt.push_str(&format!(" about people from {country}"));
    }
    if let Some(language) = language {
        prompt.push_str(&format!(" in {language}"));
    }
    prompt
}

/// Map a menu answer to the offered comedian it names. Anything that is not
/// an integer within the offered range means "no persona".
pub fn parse_menu_choice(input: &str, offered: &[String]) -> Option<String> {
    match input.trim().parse::<usize>() {
        Ok(choice) if (1..=offered.len()).contains(&choice) => Some(offered[choice - 1].clone()),
        _ => None,
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<String, BotError> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}
