mod game;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dotenv::dotenv;
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{ChatAction, KeyboardButton, KeyboardMarkup, ParseMode},
};

use game::api::CourseApi;
use game::courses::{course_stats, demo_courses, CourseFilter};
use game::progression::{spend_point, StatKind};
use game::quests::{complete_quest, is_completable, is_expired, quest_counts};
use game::{
    Course, CourseCategory, CourseDifficulty, CourseDraft, CourseLevel, DraftStep, Player, Quest,
    QuestStatus, Session,
};

type GameDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveFullName,
    Menu {
        session: Session,
    },
    QuestBoard {
        session: Session,
    },
    SpendPoints {
        session: Session,
    },
    CourseList {
        session: Session,
        courses: Vec<Course>,
        filter: CourseFilter,
    },
    ReceiveSearchTerm {
        session: Session,
        courses: Vec<Course>,
        filter: CourseFilter,
    },
    CourseForm {
        session: Session,
        draft: CourseDraft,
    },
}

type SessionStorage = std::sync::Arc<ErasedStorage<State>>;

#[tokio::main]
async fn main() {
    dotenv().expect("Failed to load .env file");

    pretty_env_logger::init();
    log::info!("Starting levelup bot...");

    let bot = Bot::from_env();

    println!("Establishing connection to the database...");
    let storage: SessionStorage = SqliteStorage::open("db.sqlite", Json)
        .await
        .unwrap()
        .erase();
    println!("Connection established");

    let api = Arc::new(CourseApi::from_env());
    let api_for_menu = api.clone();
    let api_for_list = api.clone();
    let api_for_form = api;

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveFullName].endpoint(receive_full_name))
            .branch(dptree::case![State::Menu { session }].endpoint(
                move |bot: Bot, dialogue: GameDialogue, session: Session, msg: Message| {
                    menu(api_for_menu.clone(), bot, dialogue, session, msg)
                },
            ))
            .branch(dptree::case![State::QuestBoard { session }].endpoint(quest_board))
            .branch(dptree::case![State::SpendPoints { session }].endpoint(spend_points))
            .branch(
                dptree::case![State::CourseList {
                    session,
                    courses,
                    filter
                }]
                .endpoint(
                    move |bot: Bot,
                          dialogue: GameDialogue,
                          (session, courses, filter): (Session, Vec<Course>, CourseFilter),
                          msg: Message| {
                        course_list(
                            api_for_list.clone(),
                            bot,
                            dialogue,
                            (session, courses, filter),
                            msg,
                        )
                    },
                ),
            )
            .branch(
                dptree::case![State::ReceiveSearchTerm {
                    session,
                    courses,
                    filter
                }]
                .endpoint(receive_search_term),
            )
            .branch(dptree::case![State::CourseForm { session, draft }].endpoint(
                move |bot: Bot,
                      dialogue: GameDialogue,
                      (session, draft): (Session, CourseDraft),
                      msg: Message| {
                    course_form(api_for_form.clone(), bot, dialogue, (session, draft), msg)
                },
            )),
    )
    .dependencies(dptree::deps![storage])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str = "Привет! Я -- твоя Система прокачки. Я превращаю учёбу и тренировки в игру: квесты, опыт, уровни. Давай познакомимся! Как тебя зовут?";
async fn start(bot: Bot, dialogue: GameDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;

    dialogue.update(State::ReceiveFullName).await?;
    Ok(())
}

const PLAYER_STATUS: &str = "📊 Статус игрока";
const DAILY_QUESTS: &str = "⚔️ Ежедневные квесты";
const MY_COURSES: &str = "📚 Мои курсы";
const UPGRADE_STATS: &str = "⬆️ Прокачать";
const BACK: &str = "Назад";
const MENU_PROMPT: &str = "Что будем делать?";

async fn receive_full_name(bot: Bot, dialogue: GameDialogue, msg: Message) -> HandlerResult {
    let name = match msg.text() {
        Some(name) => name.trim().to_string(),
        None => {
            bot.send_message(msg.chat.id, "Пожалуйста, введи своё имя (текстом)")
                .await?;
            return Ok(());
        }
    };

    bot.send_message(
        msg.chat.id,
        format!("Приятно познакомиться, {}! СИСТЕМА АКТИВИРОВАНА.", name),
    )
    .await?;

    let session = Session::new(name, Utc::now());

    bot.send_message(msg.chat.id, MENU_PROMPT)
        .reply_markup(menu_keyboard())
        .await?;

    dialogue.update(State::Menu { session }).await?;
    Ok(())
}

async fn menu(
    api: Arc<CourseApi>,
    bot: Bot,
    dialogue: GameDialogue,
    session: Session,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(PLAYER_STATUS) => {
            bot.send_message(msg.chat.id, render_player_stats(&session.player))
                .parse_mode(ParseMode::Html)
                .reply_markup(menu_keyboard())
                .await?;
            dialogue.update(State::Menu { session }).await?;
        }
        Some(DAILY_QUESTS) => {
            let now = Utc::now();
            bot.send_message(msg.chat.id, render_quest_board(&session.quests, now))
                .parse_mode(ParseMode::Html)
                .reply_markup(quest_board_keyboard(&session.quests, now))
                .await?;
            dialogue.update(State::QuestBoard { session }).await?;
        }
        Some(MY_COURSES) => {
            show_course_list(
                &api,
                &bot,
                &dialogue,
                msg.chat.id,
                session,
                CourseFilter::default(),
            )
            .await?;
        }
        Some(UPGRADE_STATS) => {
            if session.player.available_points == 0 {
                bot.send_message(
                    msg.chat.id,
                    "Пока нет доступных очков. Выполняй квесты и получай новые уровни!",
                )
                .reply_markup(menu_keyboard())
                .await?;
                dialogue.update(State::Menu { session }).await?;
            } else {
                bot.send_message(
                    msg.chat.id,
                    format!(
                        "Доступно очков: {}. Какой навык прокачать?",
                        session.player.available_points
                    ),
                )
                .reply_markup(stats_keyboard())
                .await?;
                dialogue.update(State::SpendPoints { session }).await?;
            }
        }
        _ => {
            bot.send_message(msg.chat.id, "Пожалуйста, выбери один из вариантов")
                .reply_markup(menu_keyboard())
                .await?;
            dialogue.update(State::Menu { session }).await?;
        }
    }
    Ok(())
}

async fn quest_board(
    bot: Bot,
    dialogue: GameDialogue,
    session: Session,
    msg: Message,
) -> HandlerResult {
    let mut session = session;
    let now = Utc::now();

    let text = match msg.text() {
        Some(text) => text,
        None => {
            bot.send_message(msg.chat.id, "Выбери квест на клавиатуре или нажми «Назад»")
                .await?;
            return Ok(());
        }
    };

    if text == BACK {
        bot.send_message(msg.chat.id, MENU_PROMPT)
            .reply_markup(menu_keyboard())
            .await?;
        dialogue.update(State::Menu { session }).await?;
        return Ok(());
    }

    // Quest buttons carry the quest title
    let picked = session
        .quests
        .iter()
        .find(|q| is_completable(q, now) && q.title == text)
        .map(|q| (q.id, q.experience_reward));

    let (quest_id, reward) = match picked {
        Some(picked) => picked,
        None => {
            bot.send_message(msg.chat.id, "Выбери квест на клавиатуре или нажми «Назад»")
                .reply_markup(quest_board_keyboard(&session.quests, now))
                .await?;
            return Ok(());
        }
    };

    let level_before = session.player.level;
    if complete_quest(&mut session.player, &mut session.quests, quest_id, now) {
        bot.send_message(msg.chat.id, format!("✅ КВЕСТ ВЫПОЛНЕН! +{} EXP", reward))
            .await?;

        if session.player.level > level_before {
            bot.send_message(
                msg.chat.id,
                format!(
                    "🎉 НОВЫЙ УРОВЕНЬ {}! Доступно очков: {}",
                    session.player.level, session.player.available_points
                ),
            )
            .await?;
        }
    }

    bot.send_message(msg.chat.id, render_quest_board(&session.quests, now))
        .parse_mode(ParseMode::Html)
        .reply_markup(quest_board_keyboard(&session.quests, now))
        .await?;

    dialogue.update(State::QuestBoard { session }).await?;
    Ok(())
}

async fn spend_points(
    bot: Bot,
    dialogue: GameDialogue,
    session: Session,
    msg: Message,
) -> HandlerResult {
    let mut session = session;

    let text = match msg.text() {
        Some(text) => text,
        None => {
            bot.send_message(msg.chat.id, "Выбери навык на клавиатуре")
                .reply_markup(stats_keyboard())
                .await?;
            return Ok(());
        }
    };

    if text == BACK {
        bot.send_message(msg.chat.id, MENU_PROMPT)
            .reply_markup(menu_keyboard())
            .await?;
        dialogue.update(State::Menu { session }).await?;
        return Ok(());
    }

    let stat = match StatKind::from_label(text) {
        Some(stat) => stat,
        None => {
            bot.send_message(msg.chat.id, "Выбери навык на клавиатуре")
                .reply_markup(stats_keyboard())
                .await?;
            return Ok(());
        }
    };

    match spend_point(&session.player, stat) {
        Some(updated) => {
            session.player = updated;
            let value = match stat {
                StatKind::Intelligence => session.player.intelligence,
                StatKind::Discipline => session.player.discipline,
                StatKind::Stamina => session.player.stamina,
            };

            if session.player.available_points > 0 {
                bot.send_message(
                    msg.chat.id,
                    format!(
                        "{}: {}. Осталось очков: {}",
                        stat.label(),
                        value,
                        session.player.available_points
                    ),
                )
                .reply_markup(stats_keyboard())
                .await?;
                dialogue.update(State::SpendPoints { session }).await?;
            } else {
                bot.send_message(
                    msg.chat.id,
                    format!("{}: {}. Все очки распределены!", stat.label(), value),
                )
                .reply_markup(menu_keyboard())
                .await?;
                dialogue.update(State::Menu { session }).await?;
            }
        }
        None => {
            bot.send_message(msg.chat.id, "Нет доступных очков")
                .reply_markup(menu_keyboard())
                .await?;
            dialogue.update(State::Menu { session }).await?;
        }
    }
    Ok(())
}

const ALL_CATEGORIES: &str = "Все";
const SEARCH: &str = "🔍 Поиск";
const CLEAR_SEARCH: &str = "Очистить поиск";
const CREATE_COURSE: &str = "➕ Создать курс";
const STOP_COURSE: &str = "Остановить";
const START_COURSE: &str = "Активировать";
const GENERATE_QUESTS: &str = "Квесты";
const COURSES_LOAD_ERROR: &str =
    "⚠️ Не удалось загрузить курсы. Проверьте подключение к серверу. Показываю демонстрационные данные.";

async fn course_list(
    api: Arc<CourseApi>,
    bot: Bot,
    dialogue: GameDialogue,
    (session, courses, filter): (Session, Vec<Course>, CourseFilter),
    msg: Message,
) -> HandlerResult {
    let text = match msg.text() {
        Some(text) => text,
        None => {
            bot.send_message(msg.chat.id, "Пожалуйста, выбери действие на клавиатуре")
                .await?;
            return Ok(());
        }
    };

    if text == BACK {
        bot.send_message(msg.chat.id, MENU_PROMPT)
            .reply_markup(menu_keyboard())
            .await?;
        dialogue.update(State::Menu { session }).await?;
        return Ok(());
    }

    if text == CREATE_COURSE {
        let draft = CourseDraft::default();
        let (prompt, keyboard) = draft_prompt(draft.next_step());
        send_prompt(&bot, msg.chat.id, prompt, keyboard).await?;
        dialogue.update(State::CourseForm { session, draft }).await?;
        return Ok(());
    }

    if text == SEARCH {
        bot.send_message(
            msg.chat.id,
            "Введи текст для поиска по названию или описанию",
        )
        .await?;
        dialogue
            .update(State::ReceiveSearchTerm {
                session,
                courses,
                filter,
            })
            .await?;
        return Ok(());
    }

    if text == CLEAR_SEARCH {
        let filter = CourseFilter {
            category: filter.category,
            search: String::new(),
        };
        return rerender_course_list(&bot, &dialogue, msg.chat.id, session, courses, filter).await;
    }

    if text == ALL_CATEGORIES {
        let filter = CourseFilter {
            category: None,
            search: filter.search,
        };
        return rerender_course_list(&bot, &dialogue, msg.chat.id, session, courses, filter).await;
    }

    if let Some(category) = CourseCategory::from_label(text) {
        let filter = CourseFilter {
            category: Some(category),
            search: filter.search,
        };
        return rerender_course_list(&bot, &dialogue, msg.chat.id, session, courses, filter).await;
    }

    if let Some((action, index)) = parse_course_action(text) {
        let course = filter
            .apply(&courses)
            .get(index.wrapping_sub(1))
            .map(|c| (**c).clone());
        let course = match course {
            Some(course) => course,
            None => {
                bot.send_message(msg.chat.id, "Нет курса с таким номером")
                    .await?;
                return Ok(());
            }
        };

        // Ignoring the result: the typing indicator is cosmetic
        let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

        match action {
            CourseAction::Toggle => match api.toggle_course_active(course.id).await {
                Ok(_) => {
                    return show_course_list(&api, &bot, &dialogue, msg.chat.id, session, filter)
                        .await;
                }
                Err(err) => {
                    log::error!("Error toggling course {}: {}", course.id, err);
                    bot.send_message(msg.chat.id, "Ошибка при изменении статуса курса")
                        .await?;
                }
            },
            CourseAction::GenerateQuests => match api.generate_quests(course.id).await {
                Ok(_) => {
                    bot.send_message(
                        msg.chat.id,
                        "Запрос на генерацию квестов отправлен! Квесты появятся в системе после обработки ИИ.",
                    )
                    .await?;
                }
                Err(err) => {
                    log::error!("Error generating quests for course {}: {}", course.id, err);
                    bot.send_message(msg.chat.id, "Ошибка при генерации квестов")
                        .await?;
                }
            },
        }
        return Ok(());
    }

    bot.send_message(msg.chat.id, "Пожалуйста, выбери действие на клавиатуре")
        .await?;
    Ok(())
}

async fn receive_search_term(
    bot: Bot,
    dialogue: GameDialogue,
    (session, courses, filter): (Session, Vec<Course>, CourseFilter),
    msg: Message,
) -> HandlerResult {
    let term = match msg.text() {
        Some(term) => term.trim().to_string(),
        None => {
            bot.send_message(msg.chat.id, "Пожалуйста, введи текст для поиска")
                .await?;
            return Ok(());
        }
    };

    let filter = CourseFilter {
        category: filter.category,
        search: term,
    };
    rerender_course_list(&bot, &dialogue, msg.chat.id, session, courses, filter).await
}

async fn course_form(
    api: Arc<CourseApi>,
    bot: Bot,
    dialogue: GameDialogue,
    (session, draft): (Session, CourseDraft),
    msg: Message,
) -> HandlerResult {
    let mut draft = draft;

    let text = match msg.text() {
        Some(text) => text.trim(),
        None => {
            bot.send_message(msg.chat.id, "Пожалуйста, отправь текст")
                .await?;
            return Ok(());
        }
    };

    match draft.next_step() {
        DraftStep::Title => draft.title = Some(text.to_string()),
        DraftStep::Description => draft.description = Some(text.to_string()),
        DraftStep::Category => match CourseCategory::from_label(text) {
            Some(category) => draft.category = Some(category),
            None => {
                bot.send_message(msg.chat.id, "Выбери категорию на клавиатуре")
                    .reply_markup(categories_keyboard())
                    .await?;
                return Ok(());
            }
        },
        DraftStep::Goal => draft.goal = Some(text.to_string()),
        DraftStep::CurrentLevel => match CourseLevel::from_label(text) {
            Some(level) => draft.current_level = Some(level),
            None => {
                bot.send_message(msg.chat.id, "Выбери уровень на клавиатуре")
                    .reply_markup(levels_keyboard())
                    .await?;
                return Ok(());
            }
        },
        DraftStep::TargetLevel => match CourseLevel::from_label(text) {
            Some(level) => draft.target_level = Some(level),
            None => {
                bot.send_message(msg.chat.id, "Выбери уровень на клавиатуре")
                    .reply_markup(levels_keyboard())
                    .await?;
                return Ok(());
            }
        },
        DraftStep::Duration => match text.parse::<u32>() {
            Ok(0) => {
                bot.send_message(msg.chat.id, "Длительность не может быть 0")
                    .await?;
                return Ok(());
            }
            Ok(days) => draft.duration = Some(days),
            Err(_) => {
                bot.send_message(msg.chat.id, "Пожалуйста, введи число")
                    .await?;
                return Ok(());
            }
        },
        DraftStep::Difficulty => match CourseDifficulty::from_label(text) {
            Some(difficulty) => draft.difficulty = Some(difficulty),
            None => {
                bot.send_message(msg.chat.id, "Выбери сложность на клавиатуре")
                    .reply_markup(difficulties_keyboard())
                    .await?;
                return Ok(());
            }
        },
        DraftStep::Tags => {
            if text == TAGS_DONE {
                draft.tags_done = true;
            } else {
                draft.add_tag(text);
                bot.send_message(
                    msg.chat.id,
                    format!(
                        "Добавил! Теги: {}. Ещё тег или «{}»",
                        draft.tags.join(", "),
                        TAGS_DONE
                    ),
                )
                .reply_markup(tags_keyboard())
                .await?;
                dialogue.update(State::CourseForm { session, draft }).await?;
                return Ok(());
            }
        }
        DraftStep::EstimatedHours => match text.parse::<u32>() {
            Ok(0) => {
                bot.send_message(msg.chat.id, "Количество часов не может быть 0")
                    .await?;
                return Ok(());
            }
            Ok(hours) => draft.estimated_hours = Some(hours),
            Err(_) => {
                bot.send_message(msg.chat.id, "Пожалуйста, введи число")
                    .await?;
                return Ok(());
            }
        },
        DraftStep::Done => {}
    }

    if draft.next_step() == DraftStep::Done {
        let request = match draft.into_request() {
            Some(request) => request,
            None => {
                bot.send_message(msg.chat.id, "Форма заполнена не до конца, начнём заново")
                    .await?;
                dialogue
                    .update(State::CourseForm {
                        session,
                        draft: CourseDraft::default(),
                    })
                    .await?;
                return Ok(());
            }
        };

        let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

        match api.create_course(&request).await {
            Ok(course) => {
                bot.send_message(msg.chat.id, format!("Курс «{}» создан!", course.title))
                    .await?;
            }
            Err(err) => {
                log::error!("Error creating course: {}", err);
                bot.send_message(
                    msg.chat.id,
                    "Не удалось создать курс. Проверьте подключение к серверу.",
                )
                .await?;
            }
        }

        return show_course_list(
            &api,
            &bot,
            &dialogue,
            msg.chat.id,
            session,
            CourseFilter::default(),
        )
        .await;
    }

    let (prompt, keyboard) = draft_prompt(draft.next_step());
    send_prompt(&bot, msg.chat.id, prompt, keyboard).await?;
    dialogue.update(State::CourseForm { session, draft }).await?;
    Ok(())
}

/// Fetches the course list from the backend and renders it. When the
/// backend is unreachable the demonstration dataset is shown instead,
/// with a warning.
async fn show_course_list(
    api: &CourseApi,
    bot: &Bot,
    dialogue: &GameDialogue,
    chat_id: ChatId,
    session: Session,
    filter: CourseFilter,
) -> HandlerResult {
    let _ = bot.send_chat_action(chat_id, ChatAction::Typing).await;

    let courses = match api.get_all_courses().await {
        Ok(courses) => courses,
        Err(err) => {
            log::error!("Error loading courses: {}", err);
            bot.send_message(chat_id, COURSES_LOAD_ERROR).await?;
            demo_courses(Utc::now())
        }
    };

    rerender_course_list(bot, dialogue, chat_id, session, courses, filter).await
}

/// Renders the stored course list through the current filter. No network
/// round-trip: filtering is client-side.
async fn rerender_course_list(
    bot: &Bot,
    dialogue: &GameDialogue,
    chat_id: ChatId,
    session: Session,
    courses: Vec<Course>,
    filter: CourseFilter,
) -> HandlerResult {
    bot.send_message(chat_id, render_course_list(&courses, &filter))
        .parse_mode(ParseMode::Html)
        .reply_markup(course_keyboard(&courses, &filter))
        .await?;

    dialogue
        .update(State::CourseList {
            session,
            courses,
            filter,
        })
        .await?;
    Ok(())
}

async fn send_prompt(
    bot: &Bot,
    chat_id: ChatId,
    prompt: &str,
    keyboard: Option<KeyboardMarkup>,
) -> HandlerResult {
    match keyboard {
        Some(keyboard) => {
            bot.send_message(chat_id, prompt)
                .reply_markup(keyboard)
                .await?;
        }
        None => {
            bot.send_message(chat_id, prompt).await?;
        }
    }
    Ok(())
}

enum CourseAction {
    Toggle,
    GenerateQuests,
}

/// "Остановить 2" / "Активировать 2" / "Квесты 2" -> action plus 1-based
/// index into the currently shown list.
fn parse_course_action(text: &str) -> Option<(CourseAction, usize)> {
    let (verb, index) = text.rsplit_once(' ')?;
    let index: usize = index.parse().ok()?;
    match verb {
        STOP_COURSE | START_COURSE => Some((CourseAction::Toggle, index)),
        GENERATE_QUESTS => Some((CourseAction::GenerateQuests, index)),
        _ => None,
    }
}

const TAGS_DONE: &str = "Готово";

fn draft_prompt(step: DraftStep) -> (&'static str, Option<KeyboardMarkup>) {
    match step {
        DraftStep::Title => (
            "Как назовём курс? Например: Изучение React или Тренировка воркаут",
            None,
        ),
        DraftStep::Description => ("Опиши, что ты будешь изучать или тренировать", None),
        DraftStep::Category => ("Выбери категорию", Some(categories_keyboard())),
        DraftStep::Goal => (
            "Какая цель у курса? Например: Научиться подтягиваться 15 раз",
            None,
        ),
        DraftStep::CurrentLevel => ("Какой у тебя текущий уровень?", Some(levels_keyboard())),
        DraftStep::TargetLevel => ("Какого уровня хочешь достичь?", Some(levels_keyboard())),
        DraftStep::Duration => ("Сколько дней продлится курс? Введи число", None),
        DraftStep::Difficulty => ("Выбери сложность", Some(difficulties_keyboard())),
        DraftStep::Tags => (
            "Отправляй теги по одному. Когда закончишь, нажми «Готово»",
            Some(tags_keyboard()),
        ),
        DraftStep::EstimatedHours => ("Сколько примерно часов уйдёт на курс? Введи число", None),
        DraftStep::Done => ("", None),
    }
}

fn menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(PLAYER_STATUS),
            KeyboardButton::new(DAILY_QUESTS),
        ],
        vec![
            KeyboardButton::new(MY_COURSES),
            KeyboardButton::new(UPGRADE_STATS),
        ],
    ])
}

fn stats_keyboard() -> KeyboardMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = vec![StatKind::ALL
        .iter()
        .map(|stat| KeyboardButton::new(stat.label()))
        .collect()];
    rows.push(vec![KeyboardButton::new(BACK)]);
    KeyboardMarkup::new(rows)
}

fn quest_board_keyboard(quests: &[Quest], now: DateTime<Utc>) -> KeyboardMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = quests
        .iter()
        .filter(|q| is_completable(q, now))
        .map(|q| vec![KeyboardButton::new(q.title.clone())])
        .collect();
    rows.push(vec![KeyboardButton::new(BACK)]);
    KeyboardMarkup::new(rows)
}

fn categories_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(CourseCategory::Study.label()),
            KeyboardButton::new(CourseCategory::Fitness.label()),
            KeyboardButton::new(CourseCategory::Creative.label()),
        ],
        vec![
            KeyboardButton::new(CourseCategory::Personal.label()),
            KeyboardButton::new(CourseCategory::Other.label()),
        ],
    ])
}

fn levels_keyboard() -> KeyboardMarkup {
    let row: Vec<KeyboardButton> = CourseLevel::ALL
        .iter()
        .map(|level| KeyboardButton::new(level.label()))
        .collect();
    KeyboardMarkup::new(vec![row])
}

fn difficulties_keyboard() -> KeyboardMarkup {
    let row: Vec<KeyboardButton> = CourseDifficulty::ALL
        .iter()
        .map(|difficulty| KeyboardButton::new(difficulty.label()))
        .collect();
    KeyboardMarkup::new(vec![row])
}

fn tags_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(TAGS_DONE)]])
}

fn course_keyboard(courses: &[Course], filter: &CourseFilter) -> KeyboardMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = vec![
        vec![
            KeyboardButton::new(ALL_CATEGORIES),
            KeyboardButton::new(CourseCategory::Study.label()),
            KeyboardButton::new(CourseCategory::Fitness.label()),
        ],
        vec![
            KeyboardButton::new(CourseCategory::Creative.label()),
            KeyboardButton::new(CourseCategory::Personal.label()),
            KeyboardButton::new(CourseCategory::Other.label()),
        ],
    ];

    for (i, course) in filter.apply(courses).iter().enumerate() {
        let toggle = if course.is_active {
            format!("{} {}", STOP_COURSE, i + 1)
        } else {
            format!("{} {}", START_COURSE, i + 1)
        };
        rows.push(vec![
            KeyboardButton::new(toggle),
            KeyboardButton::new(format!("{} {}", GENERATE_QUESTS, i + 1)),
        ]);
    }

    let mut search_row = vec![KeyboardButton::new(SEARCH)];
    if !filter.search.is_empty() {
        search_row.push(KeyboardButton::new(CLEAR_SEARCH));
    }
    rows.push(search_row);
    rows.push(vec![
        KeyboardButton::new(CREATE_COURSE),
        KeyboardButton::new(BACK),
    ]);

    KeyboardMarkup::new(rows)
}

fn progress_bar(percent: u32) -> String {
    let filled = (percent.min(100) / 10) as usize;
    format!("{}{}", "▓".repeat(filled), "░".repeat(10 - filled))
}

fn render_player_stats(player: &Player) -> String {
    let percent = player.experience * 100 / player.experience_to_next_level;

    let mut text = format!(
        "<b>СТАТУС ИГРОКА</b>\n\n\
         {}\n\
         Уровень {} | {}/{} EXP\n\
         {} {}%\n\n\
         Интеллект: <b>{}</b>\n\
         Дисциплина: <b>{}</b>\n\
         Выносливость: <b>{}</b>\n",
        player.name,
        player.level,
        player.experience,
        player.experience_to_next_level,
        progress_bar(percent),
        percent,
        player.intelligence,
        player.discipline,
        player.stamina,
    );

    if player.available_points > 0 {
        text.push_str(&format!(
            "\nДоступно очков: <b>{}</b>\n",
            player.available_points
        ));
    }
    text.push_str(&format!(
        "\nВыполнено квестов: <b>{}</b>",
        player.total_quests_completed
    ));

    text
}

fn render_quest_board(quests: &[Quest], now: DateTime<Utc>) -> String {
    if quests.is_empty() {
        return "<b>ЕЖЕДНЕВНЫЕ КВЕСТЫ</b>\n\nКвестов на сегодня нет. Новые квесты появятся завтра!"
            .to_string();
    }

    let mut text = "<b>ЕЖЕДНЕВНЫЕ КВЕСТЫ</b>\n".to_string();
    for quest in quests {
        let deadline_text = if is_expired(quest, now) {
            "⚠️ ПРОСРОЧЕН".to_string()
        } else {
            match quest.status {
                QuestStatus::Completed => "✅ ВЫПОЛНЕН".to_string(),
                QuestStatus::Failed => "⚠️ ПРОВАЛЕН".to_string(),
                QuestStatus::Pending => format!("⏰ до {}", quest.deadline.format("%d.%m")),
            }
        };

        text.push_str(&format!(
            "\n<b>{}</b> [{}] +{} EXP\n{}\n📚 {} | {}\n",
            quest.title,
            quest.difficulty.label(),
            quest.experience_reward,
            quest.description,
            quest.category,
            deadline_text,
        ));
    }

    let counts = quest_counts(quests, now);
    text.push_str(&format!(
        "\nОсталось: {} | Выполнено: {} | Просрочено: {}",
        counts.pending, counts.completed, counts.expired
    ));

    text
}

fn render_course_list(courses: &[Course], filter: &CourseFilter) -> String {
    let mut text = "<b>МОИ КУРСЫ И ТРЕНИРОВКИ</b>\n".to_string();

    if let Some(category) = filter.category {
        text.push_str(&format!("Категория: {}\n", category.label()));
    }
    if !filter.search.is_empty() {
        text.push_str(&format!("Поиск: «{}»\n", filter.search));
    }

    let shown = filter.apply(courses);
    if shown.is_empty() {
        if filter.is_empty() {
            text.push_str("\nСоздайте свой первый курс или тренировку");
        } else {
            text.push_str("\nКурсы не найдены. Попробуйте изменить параметры поиска");
        }
    } else {
        for (i, course) in shown.iter().enumerate() {
            let status = if course.is_active {
                "АКТИВЕН"
            } else {
                "НА ПАУЗЕ"
            };
            text.push_str(&format!(
                "\n{}. {} <b>{}</b> [{}] {}\n\
                 {}\n\
                 Прогресс: {} {}%\n\
                 Цель: {}\n\
                 Уровень: {} → {} | {} дней | ~{} ч\n\
                 Теги: {}\n",
                i + 1,
                course.category.icon(),
                course.title,
                course.difficulty.label(),
                status,
                course.description,
                progress_bar(course.progress),
                course.progress,
                course.goal,
                course.current_level.label(),
                course.target_level.label(),
                course.duration,
                course.estimated_hours,
                course.tags.join(", "),
            ));
        }
    }

    let stats = course_stats(courses);
    text.push_str(&format!(
        "\nВсего курсов: {} | Активных: {}\nСредний прогресс: {}% | Часов обучения: {}",
        stats.total, stats.active, stats.avg_progress, stats.total_hours
    ));

    text
}
