use super::{
    engine::START_ENTRY,
    script::{Choice, FlowScript, Next, ScriptError},
    ContentBlock,
};

pub const MENU_ENTRY: &str = "menu";

/// The operator onboarding flow: informational broadcasts, a couple of
/// captured fields, an objection-handling hub and the final test. The
/// `menu` entry drops straight into the hub.
pub fn onboarding_script() -> Result<FlowScript, ScriptError> {
    let mut b = FlowScript::builder();
    b.entry(START_ENTRY, "welcome");
    b.entry(MENU_ENTRY, "objections_menu");

    b.broadcast(
        "welcome",
        vec![
            ContentBlock::media(
                "welcome.jpg",
                "Welcome to the operator onboarding! 🌑\n\n\
                 I will be your personal guide to the operator role — the person \
                 who builds rapport, keeps attention and turns a conversation into \
                 a result.\n\n\
                 Starting terms:\n\
                 💰 20% of all sales\n\
                 🕗 Flexible 8-hour schedule\n\
                 📆 1 day off per week\n\
                 💸 Payouts on the 7th and the 22nd",
            ),
            ContentBlock::text(
                "Why exactly these starting terms?\n\n\
                 📈 Rate raise — up to 23% once you hit your targets\n\
                 👥 Team lead role — +1% of your team's earnings\n\
                 🎯 Bonuses for consistency and initiative\n\
                 🚀 Career track — from operator to administrator\n\n\
                 Press the button below if the terms work for you 👇",
            ),
        ],
        Next::choices([Choice::new(
            "⭐ The terms work for me ⭐",
            "agree",
            "house_rules",
        )]),
    );

    b.broadcast(
        "house_rules",
        vec![ContentBlock::text(
            "❗ One thing before we begin: the clause below does not apply to the \
             7-day trial period.\n\n\
             — If you decide to end the cooperation, you work out at most 7 days \
             from the moment you notify your administrator.",
        )],
        Next::auto("ask_name"),
    );

    b.question(
        "ask_name",
        "Now let's start simple — what is your name?",
        Some("name"),
        "ask_experience",
    );

    b.broadcast(
        "ask_experience",
        vec![ContentBlock::text(
            "Lovely name, {name}! 🌟\n\n{name}, have you worked a support desk before?",
        )],
        Next::choices([
            Choice::new("Yes", "yes", "experience_yes"),
            Choice::new("No", "no", "experience_no"),
        ]),
    );

    b.broadcast(
        "experience_yes",
        vec![ContentBlock::text(
            "Great, {name}! Then the next part will feel familiar ✅",
        )],
        Next::auto("earning_prompt"),
    );
    b.broadcast(
        "experience_no",
        vec![ContentBlock::text(
            "No worries, {name}, I'll explain everything from scratch 😉",
        )],
        Next::auto("earning_prompt"),
    );

    b.broadcast(
        "earning_prompt",
        vec![ContentBlock::text(
            "Now I'll show you how exactly you will earn 💸",
        )],
        Next::choices([Choice::new("So how do I earn?", "earn", "earning")]),
    );

    b.broadcast(
        "earning",
        vec![
            ContentBlock::text(
                "Good operators turn any detail into a point of contact:\n\n\
                 Got a first name? — look up something interesting about it.\n\
                 A favourite city? — learn the local quirks and open with them.\n\
                 A basketball fan? — ask about their team and keep the talk on \
                 familiar ground.\n\n\
                 Any small detail is a way in, as long as the goal is trust and \
                 not just the sale.",
            ),
            ContentBlock::text(
                "You will be building hundreds of long-running conversations 🙌\n\n\
                 Every client has their own interest — your job is to offer the \
                 thing they cannot pass up.\n\n\
                 The formula is simple:\n\
                 Client detail + the right offer = result 📈",
            ),
            ContentBlock::text(
                "Write to your clients every day, even the ones who are not ready \
                 to commit yet. When they are, they will remember you ❤️‍🩹",
            ),
        ],
        Next::choices([Choice::new(
            "Where do I find clients?",
            "find_clients",
            "finding_clients",
        )]),
    );

    b.broadcast(
        "finding_clients",
        vec![
            ContentBlock::media(
                "fishing.jpg",
                "Think of it as fishing: the catch depends on the bait. In our \
                 case the bait is the outreach message.\n\n\
                 A client has seen hundreds of openers — make yours the one they \
                 bite on.\n\n\
                 Shorten, reword, keep it personal — the point is that it reads \
                 alive and like you.",
            ),
            ContentBlock::text(
                "Blunt, pushy outreach kills interest fast. Clients file you \
                 under \"yet another template\" — and templates never earn a \
                 reply 💸\n\n\
                 Work with a light touch: curiosity, hints, a bit of play.",
            ),
            ContentBlock::text(
                "We use 3 kinds of broadcasts:\n\n\
                 ✔️ VIP — personal messages to regular clients\n\
                 ✔️ Online — a wave to everyone currently active\n\
                 ✔️ Mass — the whole client list except VIPs\n\n\
                 Each kind is its own approach and its own chance.",
            ),
        ],
        Next::choices([Choice::new(
            "Why different broadcasts?",
            "mailing_types",
            "mailing_types",
        )]),
    );

    b.broadcast(
        "mailing_types",
        vec![
            ContentBlock::media(
                "vip.jpg",
                "VIP clients get individually written messages only. They pay \
                 for attention, not for a template.",
            ),
            ContentBlock::media(
                "online.jpg",
                "A client who is online right now is the best moment to write — \
                 the odds of a reply are highest.",
            ),
            ContentBlock::media(
                "mass.jpg",
                "The mass broadcast goes to everyone. Keep it neutral and \
                 friendly.",
            ),
            ContentBlock::text("Pick one:"),
        ],
        Next::choices([
            Choice::new("Got it", "understood", "conversation_tips"),
            Choice::new("Can I get more detail?", "more", "conversation_tips"),
        ]),
    );

    b.broadcast(
        "conversation_tips",
        vec![
            ContentBlock::text(
                "🎯 Avoid stock openers like \"Hi, how are u?\". Clients notice \
                 originality.",
            ),
            ContentBlock::text(
                "✅ Examples of non-standard openers:\n\
                 - Oh, it's you? I've been waiting!\n\
                 - Quick, I need an opinion: red or black?\n\
                 - You won't believe what just happened on my shift 😉",
            ),
        ],
        Next::choices([Choice::new("Moving on?", "continue", "focus_areas")]),
    );

    b.broadcast(
        "focus_areas",
        vec![
            ContentBlock::text(
                "Let's lock the material in. Answer in your own words when the \
                 test comes — no copy-paste.",
            ),
            ContentBlock::text("🙋 What do you rely on first when talking to a client?"),
            ContentBlock::text("🙋 Should outreach be blunt and pushy — and why not?"),
            ContentBlock::media(
                "teamwork.jpg",
                "Now let's talk tooling and teamwork 🤖",
            ),
            ContentBlock::text("Pick where to start:"),
        ],
        Next::choices([
            Choice::new("🌟 Tooling", "tooling", "tooling"),
            Choice::new("🌟 Teamwork", "teamwork", "teamwork"),
        ]),
    );

    // The tooling and teamwork nodes reference each other, so either
    // branch order covers both before moving on.
    b.broadcast(
        "tooling",
        vec![
            ContentBlock::text(
                "🟩 For day-to-day work we use the OpsDesk workspace.\n\n\
                 We were in its first test group back when it was just a browser \
                 extension; by now it has everything a productive shift needs.\n\n\
                 💻 Download it, but don't register — we send an invite link \
                 after onboarding.",
            ),
            ContentBlock::media(
                "workspace.jpg",
                "A short intro (8 minutes) to the workspace basics. Most people \
                 skip it; the ones who don't keep an edge.",
            ),
            ContentBlock::text(
                "💸 Balance tracking is the operator's second key duty — you'll \
                 need a spreadsheet account for that.",
            ),
        ],
        Next::choices([
            Choice::new("And now about the team?", "teamwork", "teamwork"),
            Choice::new("⭐ What's next? ⭐", "next", "next_steps"),
        ]),
    );

    b.broadcast(
        "teamwork",
        vec![
            ContentBlock::media(
                "team.jpg",
                "🤝 Teamwork is the base of everything here.\n\n\
                 🔹 Trust — keep your promises\n\
                 🔹 Communication — raise questions right away\n\
                 🔹 Roles — know who is responsible for what\n\
                 🔹 Tolerance — respect other opinions\n\
                 🔹 Shared growth — pass your experience on\n\
                 🔹 Ownership — answer for the result",
            ),
            ContentBlock::text("Ready to continue?"),
        ],
        Next::choices([
            Choice::new("On to the tooling", "tooling", "tooling"),
            Choice::new("⭐ What's next? ⭐", "next", "next_steps"),
        ]),
    );

    b.broadcast(
        "next_steps",
        vec![ContentBlock::text(
            "🎉 The intro part is done — objection handling is next.",
        )],
        Next::auto("objections_menu"),
    );

    b.broadcast(
        "objections_menu",
        vec![ContentBlock::text(
            "🔥 Top objections you will hear:\n\
             1. That's expensive!\n\
             2. Why should I trust you?\n\
             3. What if this is a scam?\n\
             4. I only have $10...\n\
             5. I'm not here to buy anything.\n\n\
             Pick a topic to get the tools and the answers:",
        )],
        Next::choices([
            Choice::new("That's expensive!", "obj_price", "obj_price"),
            Choice::new("Why should I trust you?", "obj_trust", "obj_trust"),
            Choice::new("What if this is a scam?", "obj_doubt", "obj_doubt"),
            Choice::new("I only have $10", "obj_budget", "obj_budget"),
            Choice::new("Platform rules", "rules_platform", "rules_platform"),
            Choice::new("Team policies", "rules_team", "rules_team"),
            Choice::new("Shift checklist", "checklist", "checklist"),
            Choice::new("Take the test", "quiz", "quiz_intro"),
        ]),
    );

    b.broadcast(
        "obj_price",
        vec![
            ContentBlock::text(
                "If a client writes \"that's expensive\", there is usually no \
                 rapport yet.\n\n\
                 The offer alone does not sell. The framing does.\n\n\
                 Weak reply: a bare restatement of the price.\n\
                 Strong reply: personal, references what the client told you, \
                 makes the value concrete.\n\n\
                 ✅ Use their name, tie the offer to their interest, make it \
                 feel made for them.",
            ),
            ContentBlock::text("Want option templates?"),
        ],
        Next::choices([Choice::new(
            "How do I offer options?",
            "options",
            "obj_price_options",
        )]),
    );

    b.broadcast(
        "obj_price_options",
        vec![
            ContentBlock::text(
                "💡 How to offer options:\n\n\
                 👉 A bundle at a small discount\n\
                 👉 A lighter package at the entry price\n\n\
                 Or a soft nudge: \"I like talking with you, so you get to \
                 choose — which one is it?\"",
            ),
            ContentBlock::text("Back?"),
        ],
        Next::choices([Choice::new(
            "Back to the objections menu",
            "menu",
            "objections_menu",
        )]),
    );

    b.broadcast(
        "obj_trust",
        vec![
            ContentBlock::text(
                "🧠 \"Why should I trust you?\"\n\n\
                 Don't push, don't argue. Options:\n\n\
                 — \"For the same reason I trust you and believe our conversation \
                 stays between us. What do you think?\"\n\n\
                 — \"Has someone let you down before, or are we just negotiating?\"",
            ),
            ContentBlock::text("Back?"),
        ],
        Next::choices([Choice::new(
            "Back to the objections menu",
            "menu",
            "objections_menu",
        )]),
    );

    b.broadcast(
        "obj_doubt",
        vec![
            ContentBlock::text(
                "💬 \"What if this is a scam? People promise one thing and \
                 deliver another.\"\n\n\
                 Options:\n\n\
                 1) Honesty + logic: \"Can I be straight with you? We both get \
                 something out of this — why would I risk it for one order?\"\n\n\
                 2) Humour: defuse it, then steer back to what they actually \
                 wanted.",
            ),
            ContentBlock::text("Back?"),
        ],
        Next::choices([Choice::new(
            "Back to the objections menu",
            "menu",
            "objections_menu",
        )]),
    );

    b.broadcast(
        "obj_budget",
        vec![
            ContentBlock::text(
                "❗ \"I only have $10\" — never get irritated and never talk the \
                 client down.\n\n\
                 A soft counter: \"I appreciate you being open with me. Can I be \
                 honest too? Do you really think $10 covers what you're asking \
                 for?\"",
            ),
            ContentBlock::text("Back?"),
        ],
        Next::choices([Choice::new(
            "Back to the objections menu",
            "menu",
            "objections_menu",
        )]),
    );

    b.broadcast(
        "rules_platform",
        vec![
            ContentBlock::text(
                "🚫 Platform rules (the essentials):\n\
                 - No clients under 18\n\
                 - No sharing anyone's personal data\n\
                 - No promises the service cannot keep\n\
                 - Respect the content policy of the platform\n\n\
                 Know the source material and mind the limits.",
            ),
            ContentBlock::text("Move on to the team policies?"),
        ],
        Next::choices([Choice::new("Team policies", "continue", "rules_team")]),
    );

    b.broadcast(
        "rules_team",
        vec![
            ContentBlock::text(
                "The team values discipline. Violations mean penalties and, \
                 repeated, the end of the cooperation.\n\
                 Honesty and respect for the work always come first.",
            ),
            ContentBlock::text("Next?"),
        ],
        Next::choices([Choice::new("Checklist and wrap-up", "continue", "checklist")]),
    );

    b.broadcast(
        "checklist",
        vec![
            ContentBlock::text(
                "🎉 The intro course is done — all that's left is the shift \
                 checklist.\n\
                 The checklist is the base of every shift: record the balance, \
                 run the VIP, online and mass broadcasts, clear the inbox.",
            ),
            ContentBlock::text("Ready for the test?"),
        ],
        Next::choices([
            Choice::new("Take the test", "quiz", "quiz_intro"),
            Choice::new("Back to the objections menu", "menu", "objections_menu"),
        ]),
    );

    b.broadcast(
        "quiz_intro",
        vec![ContentBlock::text(
            "🔎 Test started. Answer honestly, in your own words. Here we go!",
        )],
        Next::auto("quiz_1"),
    );

    let quiz = [
        "🙋 What do you rely on first when talking to a client?",
        "🙋 Should outreach messages be blunt and pushy — and why not?",
        "✍️ Write a personalised outreach message for this client: Simon, has a \
         three-year-old daughter, loves basketball 🏀",
        "After a long conversation a client writes: \"I thought you'd share that \
         one for free...\" — how do you reply?",
        "A regular client skipped a paid offer and writes \"I have no money\" — \
         what do you answer?",
        "A top client just bought an $80 package and asks for an extra one on \
         the house — how do you reply?",
        "A client says \"I get paid in a few days, can you unlock it early?\" — \
         what do you answer?",
        "A client opens with \"How are you?\" — what do you reply so the \
         conversation doesn't stall?",
        "A new client is unhappy with a purchase and wants a refund. How do you \
         keep their loyalty?",
        "A client asks for something we don't offer — how do you redirect them \
         to an option we do have?",
        "A new client immediately demands the top package — how do you respond?",
    ];
    for (idx, prompt) in quiz.iter().enumerate() {
        let next = if idx + 1 == quiz.len() {
            "finale".to_owned()
        } else {
            format!("quiz_{}", idx + 2)
        };
        b.question(format!("quiz_{}", idx + 1), *prompt, None, next);
    }

    b.terminal(
        "finale",
        vec![
            ContentBlock::text("✅ Test finished! Thanks for the answers."),
            ContentBlock::text("Your answers are saved. One last message coming up."),
            ContentBlock::text(
                "Well then — pop the good bottle 🍾, congratulations on finishing \
                 the onboarding 🔥\n\n\
                 We had a great run and it's time you started earning 💸\n\n\
                 Write to the recruiter who gave you the bot link and they will \
                 hand you over to your administrator.\n\n\
                 Now go and own this field 🚀",
            ),
        ],
    );

    b.build()
}
