use crate::types::{CodeAttachment, CodeSnippet, Message, MessageId};

const REMOVED_LOADER: &str = "// Load the scraping HTML file\nconst scrapingPath = path.join(_dirname, 'scraping', 'scraping.html');\nawait scrapingWindow.loadFile(scrapingPath);\n\n// Send URL to the window";

const ADDED_LOADER: &str = "const scrapingPath = path.join(process.cwd(), '.vite/build/helpers/ipc/model.html');\nawait scrapingWindow.loadFile(scrapingPath);\n\n// Send URL to the window";

const VITE_CONFIG: &str = "export default defineConfig({\n  resolve: {\n    alias: {\n      '@': path.resolve(__dirname, './src')\n    },\n  },\n  build: {\n    rollupOptions: {\n      external: [\n        // Externalize native modules\n        'node-llama-cpp',\n      ]\n    }\n  }\n});";

/// Conversation shown on startup. Ids start at 1.
pub fn demo_conversation() -> Vec<Message> {
    vec![
        Message::user(MessageId(1), "Same issue, file not found."),
        Message::system(
            MessageId(2),
            "I see the issue. The problem is that we're trying to load the HTML file from the wrong location after the Vite build. Let's modify the path to use the correct location in the build output:```code```",
        )
        .with_attachments(vec![CodeAttachment::Snippet(
            CodeSnippet::new(REMOVED_LOADER, Some("ts")).removed(),
        )]),
        Message::system(
            MessageId(3),
            "```code```Let's also update the Vite config to ensure the files are copied to the correct location:```code```",
        )
        .with_attachments(vec![
            CodeAttachment::Snippet(CodeSnippet::new(ADDED_LOADER, Some("ts")).added()),
            CodeAttachment::Snippet(CodeSnippet::new(VITE_CONFIG, Some("ts"))),
        ]),
    ]
}
