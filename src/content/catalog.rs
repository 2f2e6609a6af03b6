use crate::content::{Chapter, Level, Section};

// Curriculum order. `number` is 1-based and follows array position.

const CHAPTER_01_SECTIONS: &[Section] = &[
    Section {
        id: "section-01",
        title: "Dockerとは何か",
        slug: "what-is-docker",
    },
    Section {
        id: "section-02",
        title: "仮想マシンとコンテナの違い",
        slug: "vm-vs-container",
    },
    Section {
        id: "section-03",
        title: "Dockerのアーキテクチャ",
        slug: "docker-architecture",
    },
    Section {
        id: "section-04",
        title: "Dockerのインストール",
        slug: "docker-installation",
    },
    Section {
        id: "section-05",
        title: "初めてのDockerコマンド",
        slug: "first-docker-command",
    },
    Section {
        id: "section-06",
        title: "Docker Desktopの使い方",
        slug: "docker-desktop",
    },
];

const CHAPTER_02_SECTIONS: &[Section] = &[
    Section {
        id: "section-01",
        title: "Dockerイメージとは",
        slug: "what-is-image",
    },
    Section {
        id: "section-02",
        title: "Docker Hubの使い方",
        slug: "docker-hub",
    },
    Section {
        id: "section-03",
        title: "イメージの取得・一覧・削除",
        slug: "image-management",
    },
    Section {
        id: "section-04",
        title: "コンテナの起動・停止・削除",
        slug: "container-lifecycle",
    },
    Section {
        id: "section-05",
        title: "コンテナのライフサイクル",
        slug: "lifecycle-details",
    },
    Section {
        id: "section-06",
        title: "コンテナ内での操作",
        slug: "container-operations",
    },
    Section {
        id: "section-07",
        title: "ログの確認と管理",
        slug: "container-logs",
    },
];

const CHAPTER_03_SECTIONS: &[Section] = &[
    Section {
        id: "section-01",
        title: "Dockerfileの基本構文",
        slug: "dockerfile-basics",
    },
    Section {
        id: "section-02",
        title: "FROM, RUN, COPY, ADD",
        slug: "dockerfile-commands-1",
    },
    Section {
        id: "section-03",
        title: "WORKDIR, ENV, ARG",
        slug: "dockerfile-commands-2",
    },
    Section {
        id: "section-04",
        title: "EXPOSE, CMD, ENTRYPOINT",
        slug: "dockerfile-commands-3",
    },
    Section {
        id: "section-05",
        title: ".dockerignoreの活用",
        slug: "dockerignore",
    },
    Section {
        id: "section-06",
        title: "イメージのビルドとタグ付け",
        slug: "image-build",
    },
    Section {
        id: "section-07",
        title: "レイヤーキャッシュの理解",
        slug: "layer-cache",
    },
];

const CHAPTER_04_SECTIONS: &[Section] = &[
    Section {
        id: "section-01",
        title: "Docker Composeとは",
        slug: "what-is-compose",
    },
    Section {
        id: "section-02",
        title: "docker-compose.ymlの基本構文",
        slug: "compose-syntax",
    },
    Section {
        id: "section-03",
        title: "複数サービスの定義",
        slug: "multiple-services",
    },
    Section {
        id: "section-04",
        title: "環境変数と.envファイル",
        slug: "environment-variables",
    },
    Section {
        id: "section-05",
        title: "サービス間の依存関係",
        slug: "service-dependencies",
    },
    Section {
        id: "section-06",
        title: "Composeコマンド詳解",
        slug: "compose-commands",
    },
    Section {
        id: "section-07",
        title: "開発環境の構築例",
        slug: "dev-environment",
    },
];

const CHAPTER_05_SECTIONS: &[Section] = &[
    Section {
        id: "section-01",
        title: "Dockerネットワークの基礎",
        slug: "network-basics",
    },
    Section {
        id: "section-02",
        title: "ネットワークの種類",
        slug: "network-types",
    },
    Section {
        id: "section-03",
        title: "カスタムネットワークの作成",
        slug: "custom-network",
    },
    Section {
        id: "section-04",
        title: "コンテナ間通信",
        slug: "container-communication",
    },
    Section {
        id: "section-05",
        title: "Dockerボリュームの基礎",
        slug: "volume-basics",
    },
    Section {
        id: "section-06",
        title: "ボリュームの種類",
        slug: "volume-types",
    },
    Section {
        id: "section-07",
        title: "データの永続化戦略",
        slug: "persistence-strategy",
    },
];

const CHAPTER_06_SECTIONS: &[Section] = &[
    Section {
        id: "section-01",
        title: "マルチステージビルド",
        slug: "multi-stage-build",
    },
    Section {
        id: "section-02",
        title: "イメージサイズの削減テクニック",
        slug: "size-reduction",
    },
    Section {
        id: "section-03",
        title: "ベースイメージの選択",
        slug: "base-image-selection",
    },
    Section {
        id: "section-04",
        title: "レイヤー最適化",
        slug: "layer-optimization",
    },
    Section {
        id: "section-05",
        title: "ビルド時間の短縮",
        slug: "build-time-optimization",
    },
    Section {
        id: "section-06",
        title: "Docker BuildKit",
        slug: "buildkit",
    },
];

const CHAPTER_07_SECTIONS: &[Section] = &[
    Section {
        id: "section-01",
        title: "コンテナセキュリティの基礎",
        slug: "security-basics",
    },
    Section {
        id: "section-02",
        title: "非rootユーザーでの実行",
        slug: "non-root-user",
    },
    Section {
        id: "section-03",
        title: "イメージの脆弱性スキャン",
        slug: "vulnerability-scan",
    },
    Section {
        id: "section-04",
        title: "シークレット管理",
        slug: "secret-management",
    },
    Section {
        id: "section-05",
        title: "ネットワークセキュリティ",
        slug: "network-security",
    },
    Section {
        id: "section-06",
        title: "リソース制限",
        slug: "resource-limits",
    },
    Section {
        id: "section-07",
        title: "セキュリティベストプラクティス",
        slug: "security-best-practices",
    },
];

const CHAPTER_08_SECTIONS: &[Section] = &[
    Section {
        id: "section-01",
        title: "本番環境向けDockerfile",
        slug: "production-dockerfile",
    },
    Section {
        id: "section-02",
        title: "ヘルスチェックの実装",
        slug: "health-check",
    },
    Section {
        id: "section-03",
        title: "ログ管理戦略",
        slug: "log-management",
    },
    Section {
        id: "section-04",
        title: "コンテナの監視",
        slug: "container-monitoring",
    },
    Section {
        id: "section-05",
        title: "バックアップとリストア",
        slug: "backup-restore",
    },
    Section {
        id: "section-06",
        title: "Docker Swarmの基礎",
        slug: "docker-swarm",
    },
];

const CHAPTER_09_SECTIONS: &[Section] = &[
    Section {
        id: "section-01",
        title: "CI/CDパイプラインでのDocker",
        slug: "docker-in-cicd",
    },
    Section {
        id: "section-02",
        title: "GitHub ActionsでのDocker利用",
        slug: "github-actions",
    },
    Section {
        id: "section-03",
        title: "プライベートレジストリ",
        slug: "private-registry",
    },
    Section {
        id: "section-04",
        title: "イメージの自動ビルド",
        slug: "auto-build",
    },
    Section {
        id: "section-05",
        title: "自動デプロイメント",
        slug: "auto-deployment",
    },
];

const CHAPTER_10_SECTIONS: &[Section] = &[
    Section {
        id: "section-01",
        title: "Kubernetesの概要",
        slug: "kubernetes-overview",
    },
    Section {
        id: "section-02",
        title: "DockerからKubernetesへ",
        slug: "docker-to-k8s",
    },
    Section {
        id: "section-03",
        title: "Podとコンテナ",
        slug: "pods-and-containers",
    },
    Section {
        id: "section-04",
        title: "Deploymentの基礎",
        slug: "deployment-basics",
    },
    Section {
        id: "section-05",
        title: "Docker Desktop + Kubernetes",
        slug: "desktop-k8s",
    },
];

const CHAPTER_11_SECTIONS: &[Section] = &[
    Section {
        id: "section-01",
        title: "Dockerコマンド一覧",
        slug: "docker-commands",
    },
    Section {
        id: "section-02",
        title: "Docker Composeコマンド一覧",
        slug: "compose-commands-ref",
    },
    Section {
        id: "section-03",
        title: "Dockerfile命令一覧",
        slug: "dockerfile-instructions",
    },
    Section {
        id: "section-04",
        title: "トラブルシューティングガイド",
        slug: "troubleshooting",
    },
    Section {
        id: "section-05",
        title: "ベストプラクティス集",
        slug: "best-practices",
    },
    Section {
        id: "section-06",
        title: "用語集",
        slug: "glossary",
    },
];

pub const CHAPTERS: &[Chapter] = &[
    Chapter {
        id: "chapter-01",
        number: 1,
        title: "入門編 - Dockerを始めよう",
        description: "Dockerの基本概念とインストール方法を学びます",
        level: Level::Beginner,
        sections: CHAPTER_01_SECTIONS,
    },
    Chapter {
        id: "chapter-02",
        number: 2,
        title: "基礎編 - イメージとコンテナ",
        description: "Dockerイメージとコンテナの基本操作をマスターします",
        level: Level::Beginner,
        sections: CHAPTER_02_SECTIONS,
    },
    Chapter {
        id: "chapter-03",
        number: 3,
        title: "基礎編 - Dockerfile",
        description: "Dockerfileを使ってカスタムイメージを作成します",
        level: Level::Beginner,
        sections: CHAPTER_03_SECTIONS,
    },
    Chapter {
        id: "chapter-04",
        number: 4,
        title: "中級編 - Docker Compose",
        description: "複数コンテナのアプリケーションを構築・管理します",
        level: Level::Intermediate,
        sections: CHAPTER_04_SECTIONS,
    },
    Chapter {
        id: "chapter-05",
        number: 5,
        title: "中級編 - ネットワークとボリューム",
        description: "Dockerのネットワークとデータ永続化を理解します",
        level: Level::Intermediate,
        sections: CHAPTER_05_SECTIONS,
    },
    Chapter {
        id: "chapter-06",
        number: 6,
        title: "応用編 - イメージ最適化",
        description: "効率的で軽量なDockerイメージを作成します",
        level: Level::Advanced,
        sections: CHAPTER_06_SECTIONS,
    },
    Chapter {
        id: "chapter-07",
        number: 7,
        title: "応用編 - セキュリティ",
        description: "セキュアなコンテナ環境を構築します",
        level: Level::Advanced,
        sections: CHAPTER_07_SECTIONS,
    },
    Chapter {
        id: "chapter-08",
        number: 8,
        title: "実践編 - 本番環境",
        description: "本番環境でのDocker運用を学びます",
        level: Level::Advanced,
        sections: CHAPTER_08_SECTIONS,
    },
    Chapter {
        id: "chapter-09",
        number: 9,
        title: "実践編 - CI/CD",
        description: "CI/CDパイプラインでDockerを活用します",
        level: Level::Advanced,
        sections: CHAPTER_09_SECTIONS,
    },
    Chapter {
        id: "chapter-10",
        number: 10,
        title: "実践編 - Kubernetes連携",
        description: "DockerからKubernetesへの移行を理解します",
        level: Level::Advanced,
        sections: CHAPTER_10_SECTIONS,
    },
    Chapter {
        id: "chapter-11",
        number: 11,
        title: "リファレンス",
        description: "必要な情報をすばやく参照できます",
        level: Level::Reference,
        sections: CHAPTER_11_SECTIONS,
    },
];
